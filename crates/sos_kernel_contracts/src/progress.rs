#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::ContractViolation;

pub const MIN_HERO_LEVEL: u8 = 1;
pub const MAX_HERO_LEVEL: u8 = 5;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TrainingModuleId {
    Cpr,
    FirstAid,
    Voice,
    Features,
    EmergencyTypes,
}

impl TrainingModuleId {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Cpr,
            Self::FirstAid,
            Self::Voice,
            Self::Features,
            Self::EmergencyTypes,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cpr => "cpr",
            Self::FirstAid => "first_aid",
            Self::Voice => "voice",
            Self::Features => "features",
            Self::EmergencyTypes => "emergency_types",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Cpr => "CPR Training",
            Self::FirstAid => "First Aid Basics",
            Self::Voice => "Voice Recognition",
            Self::Features => "App Features",
            Self::EmergencyTypes => "Emergency Types",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == normalized)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CrossAppChallengeId {
    CprDefi,
    EmergencyGaming,
    SafetyTrading,
    HeroDefi,
    CommunitySwap,
}

impl CrossAppChallengeId {
    pub const fn all() -> &'static [Self] {
        &[
            Self::CprDefi,
            Self::EmergencyGaming,
            Self::SafetyTrading,
            Self::HeroDefi,
            Self::CommunitySwap,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CprDefi => "cpr_defi",
            Self::EmergencyGaming => "emergency_gaming",
            Self::SafetyTrading => "safety_trading",
            Self::HeroDefi => "hero_defi",
            Self::CommunitySwap => "community_swap",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
    }
}

/// Derived gamification tier, always within `MIN_HERO_LEVEL..=MAX_HERO_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeroLevel(u8);

impl HeroLevel {
    pub const MIN: Self = Self(MIN_HERO_LEVEL);

    pub fn new(level: u8) -> Result<Self, ContractViolation> {
        if !(MIN_HERO_LEVEL..=MAX_HERO_LEVEL).contains(&level) {
            return Err(ContractViolation::InvalidRange {
                field: "hero_level",
                min: MIN_HERO_LEVEL as f64,
                max: MAX_HERO_LEVEL as f64,
                got: level as f64,
            });
        }
        Ok(Self(level))
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn is_max(self) -> bool {
        self.0 == MAX_HERO_LEVEL
    }

    pub const fn title(self) -> &'static str {
        match self.0 {
            1 => "Novice Hero",
            2 => "Trainee Hero",
            3 => "Emergency Responder",
            4 => "Safety Guardian",
            _ => "Life Protector",
        }
    }
}

impl TryFrom<u8> for HeroLevel {
    type Error = ContractViolation;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HeroLevel> for u8 {
    fn from(value: HeroLevel) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextLevel {
    /// Experience needed to reach the next level.
    Threshold(u32),
    MaximumReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub completed: u32,
    pub total: u32,
    pub percent: u32,
    pub experience: u32,
    pub level: HeroLevel,
    pub next_level: NextLevel,
}
