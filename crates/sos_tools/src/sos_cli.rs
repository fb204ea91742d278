#![forbid(unsafe_code)]

use serde::Serialize;
use sos_engines::instructions::{instructions_for_key, render_instructions};
use sos_engines::keyword::KeywordMatcher;
use sos_engines::reward::calculate;
use sos_engines::wake::WakeSession;
use sos_kernel_contracts::achievement::AchievementId;
use sos_kernel_contracts::emergency::EmergencyType;
use sos_kernel_contracts::progress::{
    CrossAppChallengeId, NextLevel, ProgressReport, TrainingModuleId,
};
use sos_kernel_contracts::reward::RewardPair;
use sos_os::achievements::board;
use sos_os::config::SosConfig;
use sos_os::contacts::ContactRuntime;
use sos_os::emergency::{ActivationOutcome, ActivationSource, EmergencyRuntime, VoiceOutcome};
use sos_os::training::{CompletionOutcome, TrainingRuntime};
use sos_storage::repo::{EmergencyRecordRepo, RewardTotalsRepo};
use sos_storage::state::SosStore;

use crate::cli::{Commands, CompleteCommands, ContactCommands};

#[derive(Debug, Serialize)]
struct VoiceStep {
    utterance: String,
    outcome: &'static str,
    activation: Option<ActivationOutcome>,
}

#[derive(Debug, Serialize)]
struct ProgressView {
    training: ProgressReport,
    challenges: ProgressReport,
}

pub fn execute_command(
    command: &Commands,
    config: &SosConfig,
    json: bool,
    now_unix_ms: u64,
) -> Result<String, String> {
    match command {
        Commands::Detect { transcript } => {
            let m = KeywordMatcher::default().detect(transcript);
            render(json, &m, || match &m {
                Some(m) => format!(
                    "{} (keyword \"{}\" at byte {})",
                    m.emergency_type, m.keyword, m.byte_offset
                ),
                None => "no emergency detected".to_string(),
            })
        }
        Commands::Activate {
            transcript,
            emergency_type,
        } => {
            let mut store = open_store(config)?;
            let runtime = EmergencyRuntime::simulated(config);
            let outcome = match (transcript, emergency_type) {
                (_, Some(raw)) => runtime.activate(
                    &mut store,
                    parse_emergency_type(raw)?,
                    ActivationSource::Manual,
                    now_unix_ms,
                ),
                (Some(t), None) => runtime.activate_transcript(&mut store, t, now_unix_ms),
                (None, None) => return Err("usage: sos activate <transcript>".to_string()),
            }
            .map_err(|e| e.to_string())?;
            render(json, &outcome, || activation_text(&outcome))
        }
        Commands::Voice { utterances } => {
            let mut store = open_store(config)?;
            let runtime = EmergencyRuntime::simulated(config);
            let mut session = WakeSession::new(config.wake_config());
            let mut steps = Vec::with_capacity(utterances.len());
            for utterance in utterances {
                let outcome = runtime
                    .handle_voice(&mut session, &mut store, utterance, now_unix_ms)
                    .map_err(|e| e.to_string())?;
                let (label, activation) = match outcome {
                    VoiceOutcome::Ignored => ("ignored", None),
                    VoiceOutcome::WakeDetected => ("wake_detected", None),
                    VoiceOutcome::NotRecognized => ("not_recognized", None),
                    VoiceOutcome::Activated(out) => ("activated", Some(*out)),
                };
                steps.push(VoiceStep {
                    utterance: utterance.clone(),
                    outcome: label,
                    activation,
                });
            }
            render(json, &steps, || {
                steps
                    .iter()
                    .map(|s| match &s.activation {
                        Some(out) => activation_text(out),
                        None => format!("{}: {}", s.utterance, voice_label(s.outcome)),
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Commands::Instructions { emergency_type } => {
            let steps = instructions_for_key(emergency_type);
            render(json, &steps, || render_instructions(steps))
        }
        Commands::Reward {
            emergency_type,
            action,
        } => {
            let quote = calculate(emergency_type, action);
            render(json, &quote, || {
                format!(
                    "emergency: {}\naction: {}\ntotal: {}",
                    pair_text(quote.emergency),
                    pair_text(quote.action),
                    pair_text(quote.total)
                )
            })
        }
        Commands::Train {
            command: CompleteCommands::Complete { id },
        } => {
            let module = parse_training_module(id)?;
            let mut store = open_store(config)?;
            let out = TrainingRuntime::default()
                .complete_module(&mut store, module)
                .map_err(|e| e.to_string())?;
            render(json, &out, || {
                completion_text(module.display_name(), "training", &out)
            })
        }
        Commands::Challenge {
            command: CompleteCommands::Complete { id },
        } => {
            let challenge = parse_challenge(id)?;
            let mut store = open_store(config)?;
            let out = TrainingRuntime::default()
                .complete_challenge(&mut store, challenge)
                .map_err(|e| e.to_string())?;
            render(json, &out, || {
                completion_text(challenge.as_str(), "challenges", &out)
            })
        }
        Commands::Progress => {
            let store = open_store(config)?;
            let rt = TrainingRuntime::default();
            let view = ProgressView {
                training: rt.training_progress(&store),
                challenges: rt.challenge_progress(&store),
            };
            render(json, &view, || {
                format!(
                    "{}\n{}",
                    progress_text("training", &view.training),
                    progress_text("challenges", &view.challenges)
                )
            })
        }
        Commands::Contacts { command } => {
            let mut store = open_store(config)?;
            let rt = ContactRuntime;
            match command {
                ContactCommands::Add { name, phone } => {
                    let added = rt
                        .add_contact(&mut store, name, phone)
                        .map_err(|e| e.to_string())?;
                    render(json, &added, || {
                        let line = format!(
                            "added {} {} ({} contact(s)), reward {}",
                            added.contact.name,
                            added.contact.phone,
                            added.contact_count,
                            pair_text(added.reward)
                        );
                        with_unlock(line, added.unlocked)
                    })
                }
                ContactCommands::Rm => {
                    let removed = rt
                        .remove_last_contact(&mut store)
                        .map_err(|e| e.to_string())?;
                    render(json, &removed, || match &removed {
                        Some(c) => format!("removed {} {}", c.name, c.phone),
                        None => "no contacts to remove".to_string(),
                    })
                }
                ContactCommands::Ls => {
                    let contacts = rt.list_contacts(&store);
                    render(json, &contacts, || {
                        if contacts.is_empty() {
                            return "no emergency contacts".to_string();
                        }
                        contacts
                            .iter()
                            .map(|c| format!("{}\t{}", c.name, c.phone))
                            .collect::<Vec<_>>()
                            .join("\n")
                    })
                }
            }
        }
        Commands::Totals => {
            let store = open_store(config)?;
            let totals = store.reward_totals_row();
            render(json, &totals, || totals.to_string())
        }
        Commands::Records => {
            let store = open_store(config)?;
            let rows = store.emergency_record_rows();
            render(json, &rows, || {
                if rows.is_empty() {
                    return "no emergency records".to_string();
                }
                rows.iter()
                    .map(|r| {
                        format!(
                            "{}\t{}\t{}\t{}",
                            r.record_id,
                            r.record.emergency_type,
                            r.record.timestamp_unix_ms,
                            r.record.outcome
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Commands::Achievements => {
            let store = open_store(config)?;
            let view = board(&store);
            render(json, &view, || {
                let mut lines: Vec<String> = view
                    .achievements
                    .iter()
                    .map(|a| {
                        let mark = if a.unlocked { "x" } else { " " };
                        format!(
                            "[{mark}] {} {} ({} XP)",
                            a.badge, a.name, a.experience
                        )
                    })
                    .collect();
                lines.push(format!(
                    "{}/{} unlocked, {} XP",
                    view.unlocked,
                    view.achievements.len(),
                    view.experience
                ));
                lines.join("\n")
            })
        }
    }
}

pub fn parse_emergency_type(raw: &str) -> Result<EmergencyType, String> {
    EmergencyType::parse(raw).ok_or_else(|| {
        let allowed = EmergencyType::allowed_keywords().join(", ");
        format!("unknown emergency type '{raw}'. allowed: {allowed}")
    })
}

pub fn parse_training_module(raw: &str) -> Result<TrainingModuleId, String> {
    TrainingModuleId::parse(raw).ok_or_else(|| {
        let allowed: Vec<&str> = TrainingModuleId::all().iter().map(|m| m.as_str()).collect();
        format!(
            "unknown training module '{raw}'. allowed: {}",
            allowed.join(", ")
        )
    })
}

pub fn parse_challenge(raw: &str) -> Result<CrossAppChallengeId, String> {
    CrossAppChallengeId::parse(raw).ok_or_else(|| {
        let allowed: Vec<&str> = CrossAppChallengeId::all()
            .iter()
            .map(|c| c.as_str())
            .collect();
        format!("unknown challenge '{raw}'. allowed: {}", allowed.join(", "))
    })
}

fn open_store(config: &SosConfig) -> Result<SosStore, String> {
    SosStore::open(config.state_path.clone()).map_err(|e| {
        format!(
            "failed to open state {}: {e}",
            config.state_path.display()
        )
    })
}

fn render<T, F>(json: bool, value: &T, text: F) -> Result<String, String>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    if json {
        serde_json::to_string_pretty(value).map_err(|e| format!("failed to encode json: {e}"))
    } else {
        Ok(text())
    }
}

fn pair_text(pair: RewardPair) -> String {
    format!("{} BONK, {} SKR", pair.bonk, pair.skr)
}

fn voice_label(outcome: &str) -> &'static str {
    match outcome {
        "wake_detected" => "wake phrase detected, say the emergency",
        "not_recognized" => "emergency not recognized, still listening",
        _ => "ignored",
    }
}

fn activation_text(out: &ActivationOutcome) -> String {
    let mut lines = vec![format!("EMERGENCY: {}", out.emergency_type)];
    let steps: Vec<&str> = out.instructions.iter().map(String::as_str).collect();
    lines.push(render_instructions(&steps));
    lines.push(match &out.call {
        Some(call) => call.message.clone(),
        None => "emergency call failed".to_string(),
    });
    if let Some(share) = &out.location_share {
        lines.push(format!(
            "location shared with {} contact(s)",
            share.notified.len()
        ));
    }
    lines.push(match &out.record_id {
        Some(id) => format!("record: {id}"),
        None => "record: not recorded (ledger unavailable)".to_string(),
    });
    if out.newly_recorded {
        lines.push(format!("reward: {}", pair_text(out.reward.total)));
    } else {
        lines.push("reward: none (activation already recorded)".to_string());
    }
    lines.push(format!("totals: {}", out.totals));
    with_unlock(lines.join("\n"), out.unlocked)
}

fn with_unlock(text: String, unlocked: Option<AchievementId>) -> String {
    match unlocked {
        Some(a) => format!(
            "{text}\nachievement unlocked: {} {} (+{} XP)",
            a.badge(),
            a.display_name(),
            a.experience()
        ),
        None => text,
    }
}

fn completion_text(label: &str, area: &str, out: &CompletionOutcome) -> String {
    let head = if out.newly_completed {
        format!("completed {label}: +{}", pair_text(out.reward))
    } else {
        format!("{label} already completed, no reward")
    };
    with_unlock(
        format!("{head}\n{}", progress_text(area, &out.progress)),
        out.unlocked,
    )
}

fn progress_text(area: &str, report: &ProgressReport) -> String {
    let next = match report.next_level {
        NextLevel::Threshold(xp) => format!("next level at {xp} XP"),
        NextLevel::MaximumReached => "maximum level reached".to_string(),
    };
    format!(
        "{area}: {}/{} ({}%), {} XP, level {} {}, {next}",
        report.completed,
        report.total,
        report.percent,
        report.experience,
        report.level.get(),
        report.level.title()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_config(name: &str) -> (PathBuf, SosConfig) {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(1);
        let base = std::env::temp_dir().join(format!("sos-cli-test-{name}-{suffix}"));
        let cfg = SosConfig {
            state_path: base.join("state.json"),
            ..SosConfig::mvp_v1()
        };
        (base, cfg)
    }

    #[test]
    fn at_sos_cli_01_unknown_names_list_allowed_values() {
        let err = parse_emergency_type("volcano").unwrap_err();
        assert!(err.contains("heart attack"));
        let err = parse_training_module("juggling").unwrap_err();
        assert!(err.contains("first_aid"));
        assert!(parse_challenge("hero-defi").is_ok());
    }

    #[test]
    fn at_sos_cli_02_contact_then_totals_persist_between_commands() {
        let (base, cfg) = temp_config("contacts");
        let added = execute_command(
            &Commands::Contacts {
                command: ContactCommands::Add {
                    name: "Mom".to_string(),
                    phone: "5551234567".to_string(),
                },
            },
            &cfg,
            false,
            1,
        )
        .unwrap();
        assert!(added.contains("(555)-123-4567"));
        let totals = execute_command(&Commands::Totals, &cfg, false, 2).unwrap();
        assert_eq!(totals, "0 BONK, 25 SKR");
        std::fs::remove_dir_all(base).unwrap();
    }

    #[test]
    fn at_sos_cli_03_activation_without_keyword_is_an_error() {
        let (base, cfg) = temp_config("nomatch");
        let err = execute_command(
            &Commands::Activate {
                transcript: Some("nice weather".to_string()),
                emergency_type: None,
            },
            &cfg,
            false,
            1,
        )
        .unwrap_err();
        assert_eq!(err, "no emergency detected");
        let _ = std::fs::remove_dir_all(base);
    }
}
