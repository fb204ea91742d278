#![forbid(unsafe_code)]

use sos_kernel_contracts::emergency::EmergencyType;

pub const FALLBACK_INSTRUCTION: &str =
    "Call 911 immediately and follow emergency dispatcher instructions";

const FALLBACK: &[&str] = &[FALLBACK_INSTRUCTION];

/// Canned first-response steps, in the order they should be read out.
pub fn instructions_for(emergency_type: EmergencyType) -> &'static [&'static str] {
    match emergency_type {
        EmergencyType::Drowning => &[
            "Remove victim from water",
            "Check breathing",
            "Begin CPR if needed",
            "Call 911",
        ],
        EmergencyType::HeartAttack => &[
            "Call 911 immediately",
            "Have victim sit down",
            "Loosen tight clothing",
            "Monitor breathing",
        ],
        EmergencyType::Choking => &[
            "Perform Heimlich maneuver",
            "5 back blows, 5 abdominal thrusts",
            "Call 911 if not resolved",
        ],
        EmergencyType::Bleeding => &[
            "Apply direct pressure",
            "Elevate if possible",
            "Use tourniquet if severe",
            "Call 911",
        ],
        EmergencyType::Unconscious => &[
            "Check breathing",
            "Begin CPR if needed",
            "Call 911 immediately",
            "Monitor for changes",
        ],
        EmergencyType::Stroke => &[
            "Remember FAST",
            "Face, Arm, Speech, Time",
            "Call 911 immediately",
            "Note time of onset",
        ],
        EmergencyType::Seizure => &[
            "Clear area of objects",
            "Don't restrain",
            "Time the seizure",
            "Call 911 if >5 minutes",
        ],
        EmergencyType::Poisoning => &[
            "Call Poison Control",
            "Don't induce vomiting",
            "Save container",
            "Call 911 if severe",
        ],
        EmergencyType::Burn => &[
            "Cool with water",
            "Don't use ice",
            "Cover with clean cloth",
            "Call 911 if severe",
        ],
        EmergencyType::Diabetic => &[
            "Check blood sugar",
            "Give sugar if low",
            "Call 911 if unconscious",
            "Monitor breathing",
        ],
        EmergencyType::Allergic => &[
            "Use EpiPen if available",
            "Call 911 immediately",
            "Monitor breathing",
            "Lie flat if dizzy",
        ],
        EmergencyType::Trauma => &[
            "Stop bleeding",
            "Immobilize injuries",
            "Call 911",
            "Monitor consciousness",
        ],
        EmergencyType::Suicide | EmergencyType::Overdose | EmergencyType::Hypothermia => FALLBACK,
    }
}

pub fn instructions_for_key(key: &str) -> &'static [&'static str] {
    EmergencyType::parse(key)
        .map(instructions_for)
        .unwrap_or(FALLBACK)
}

/// Numbered, newline-separated rendering: `1. ...\n2. ...`. A single fallback line is
/// rendered without a number.
pub fn render_instructions(steps: &[&str]) -> String {
    if steps.len() == 1 {
        return steps[0].to_string();
    }
    steps
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {s}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_instructions_01_every_scripted_type_has_steps_mentioning_911() {
        for t in EmergencyType::all() {
            let steps = instructions_for(*t);
            assert!(!steps.is_empty(), "{t}");
            assert!(steps.iter().any(|s| s.contains("911")), "{t}");
        }
    }

    #[test]
    fn at_instructions_02_unknown_and_unscripted_keys_get_fallback() {
        assert_eq!(instructions_for_key("volcano"), &[FALLBACK_INSTRUCTION]);
        assert_eq!(
            instructions_for(EmergencyType::Hypothermia),
            &[FALLBACK_INSTRUCTION]
        );
    }

    #[test]
    fn at_instructions_03_rendering_numbers_steps() {
        let text = render_instructions(instructions_for(EmergencyType::Choking));
        assert_eq!(
            text,
            "1. Perform Heimlich maneuver\n2. 5 back blows, 5 abdominal thrusts\n3. Call 911 if not resolved"
        );
        assert_eq!(
            render_instructions(instructions_for_key("nope")),
            FALLBACK_INSTRUCTION
        );
    }
}
