#![forbid(unsafe_code)]

use serde::Serialize;
use sos_kernel_contracts::emergency::EmergencyType;
use sos_kernel_contracts::progress::{CrossAppChallengeId, TrainingModuleId};
use sos_kernel_contracts::reward::{RewardAction, RewardPair};

/// Flat BONK grant that accompanies every emergency-type SKR grant.
pub const EMERGENCY_BONK_REWARD: u32 = 25;
pub const DEFAULT_EMERGENCY_SKR_REWARD: u32 = 50;
pub const DEFAULT_EMERGENCY_REWARD: RewardPair =
    RewardPair::new(EMERGENCY_BONK_REWARD, DEFAULT_EMERGENCY_SKR_REWARD);
pub const DEFAULT_ACTION_REWARD: RewardPair = RewardPair::new(100, 20);
pub const CONTACT_SETUP_REWARD: RewardPair = RewardPair::new(0, 25);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewardQuote {
    pub emergency: RewardPair,
    pub action: RewardPair,
    pub total: RewardPair,
}

pub fn emergency_reward(emergency_type: EmergencyType) -> RewardPair {
    let skr = match emergency_type {
        EmergencyType::Drowning => 50,
        EmergencyType::HeartAttack => 75,
        EmergencyType::Choking => 60,
        EmergencyType::Bleeding => 65,
        EmergencyType::Unconscious => 80,
        EmergencyType::Stroke => 85,
        EmergencyType::Seizure => 70,
        EmergencyType::Poisoning => 55,
        EmergencyType::Burn => 45,
        EmergencyType::Diabetic => 40,
        EmergencyType::Allergic => 90,
        EmergencyType::Trauma => 75,
        EmergencyType::Suicide | EmergencyType::Overdose | EmergencyType::Hypothermia => {
            DEFAULT_EMERGENCY_SKR_REWARD
        }
    };
    RewardPair::new(EMERGENCY_BONK_REWARD, skr)
}

/// Raw-key variant: anything that is not a known keyword gets the default pair.
pub fn emergency_reward_for_key(key: &str) -> RewardPair {
    EmergencyType::parse(key)
        .map(emergency_reward)
        .unwrap_or(DEFAULT_EMERGENCY_REWARD)
}

pub fn action_reward(action: &RewardAction) -> RewardPair {
    match action {
        RewardAction::EmergencyActivation => RewardPair::new(100, 25),
        RewardAction::VoiceRecognition => RewardPair::new(50, 10),
        RewardAction::LocationSharing => RewardPair::new(75, 15),
        RewardAction::EmergencyResponse => RewardPair::new(200, 50),
        RewardAction::CprPerformed => RewardPair::new(500, 100),
        RewardAction::FirstAid => RewardPair::new(300, 75),
        RewardAction::Other(_) => DEFAULT_ACTION_REWARD,
    }
}

pub fn calculate(key: &str, action: &str) -> RewardQuote {
    let emergency = emergency_reward_for_key(key);
    let action = action_reward(&RewardAction::parse(action));
    RewardQuote {
        emergency,
        action,
        total: emergency.saturating_add(action),
    }
}

pub fn training_reward(module: TrainingModuleId) -> RewardPair {
    match module {
        TrainingModuleId::Cpr => RewardPair::new(50, 25),
        TrainingModuleId::FirstAid => RewardPair::new(30, 15),
        TrainingModuleId::Voice => RewardPair::new(25, 10),
        TrainingModuleId::Features => RewardPair::new(20, 10),
        TrainingModuleId::EmergencyTypes => RewardPair::new(40, 20),
    }
}

pub fn challenge_reward(challenge: CrossAppChallengeId) -> RewardPair {
    match challenge {
        CrossAppChallengeId::CprDefi => RewardPair::new(100, 50),
        CrossAppChallengeId::EmergencyGaming => RewardPair::new(150, 75),
        CrossAppChallengeId::SafetyTrading => RewardPair::new(120, 60),
        CrossAppChallengeId::HeroDefi => RewardPair::new(200, 100),
        CrossAppChallengeId::CommunitySwap => RewardPair::new(300, 150),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn at_reward_01_table_pairs_are_exact() {
        let expected = [
            ("drowning", 50),
            ("heart attack", 75),
            ("choking", 60),
            ("bleeding", 65),
            ("unconscious", 80),
            ("stroke", 85),
            ("seizure", 70),
            ("poisoning", 55),
            ("burn", 45),
            ("diabetic", 40),
            ("allergic", 90),
            ("trauma", 75),
            ("suicide", 50),
            ("overdose", 50),
            ("hypothermia", 50),
        ];
        assert_eq!(expected.len(), EmergencyType::all().len());
        for (key, skr) in expected {
            assert_eq!(
                emergency_reward_for_key(key),
                RewardPair::new(EMERGENCY_BONK_REWARD, skr),
                "{key}"
            );
        }
    }

    #[test]
    fn at_reward_02_unknown_key_falls_back_to_default() {
        assert_eq!(emergency_reward_for_key("alien abduction"), DEFAULT_EMERGENCY_REWARD);
        assert_eq!(emergency_reward_for_key(""), DEFAULT_EMERGENCY_REWARD);
    }

    #[test]
    fn at_reward_03_quote_sums_emergency_and_action() {
        let q = calculate("heart attack", "emergency_activation");
        assert_eq!(q.emergency, RewardPair::new(25, 75));
        assert_eq!(q.action, RewardPair::new(100, 25));
        assert_eq!(q.total, RewardPair::new(125, 100));

        let q = calculate("heart attack", "juggling");
        assert_eq!(q.action, DEFAULT_ACTION_REWARD);
    }

    #[test]
    fn at_reward_04_training_and_challenge_tables() {
        let training_total = TrainingModuleId::all()
            .iter()
            .fold(RewardPair::ZERO, |acc, m| acc.saturating_add(training_reward(*m)));
        assert_eq!(training_total, RewardPair::new(165, 80));
        assert_eq!(
            challenge_reward(CrossAppChallengeId::CommunitySwap),
            RewardPair::new(300, 150)
        );
    }

    proptest! {
        #[test]
        fn at_reward_05_non_keyword_keys_always_get_default(key in "[0-9#@ ]{0,24}") {
            prop_assert_eq!(emergency_reward_for_key(&key), DEFAULT_EMERGENCY_REWARD);
        }
    }
}
