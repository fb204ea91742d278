#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    #[serde(rename = "BONK")]
    Bonk,
    #[serde(rename = "SKR")]
    Skr,
}

impl TokenKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bonk => "BONK",
            Self::Skr => "SKR",
        }
    }
}

/// A single grant of demo tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RewardPair {
    pub bonk: u32,
    pub skr: u32,
}

impl RewardPair {
    pub const ZERO: Self = Self { bonk: 0, skr: 0 };

    pub const fn new(bonk: u32, skr: u32) -> Self {
        Self { bonk, skr }
    }

    pub fn amount(self, kind: TokenKind) -> u32 {
        match kind {
            TokenKind::Bonk => self.bonk,
            TokenKind::Skr => self.skr,
        }
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self {
            bonk: self.bonk.saturating_add(other.bonk),
            skr: self.skr.saturating_add(other.skr),
        }
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

/// What the user did to earn a grant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardAction {
    EmergencyActivation,
    VoiceRecognition,
    LocationSharing,
    EmergencyResponse,
    CprPerformed,
    FirstAid,
    Other(String),
}

impl RewardAction {
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "emergency_activation" => Self::EmergencyActivation,
            "voice_recognition" => Self::VoiceRecognition,
            "location_sharing" => Self::LocationSharing,
            "emergency_response" => Self::EmergencyResponse,
            "cpr_performed" => Self::CprPerformed,
            "first_aid" => Self::FirstAid,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            Self::EmergencyActivation => "emergency_activation",
            Self::VoiceRecognition => "voice_recognition",
            Self::LocationSharing => "location_sharing",
            Self::EmergencyResponse => "emergency_response",
            Self::CprPerformed => "cpr_performed",
            Self::FirstAid => "first_aid",
            Self::Other(tag) => tag,
        }
    }
}

/// Running token totals. Wider than `RewardPair` so repeated grants cannot wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RewardTotals {
    pub bonk: u64,
    pub skr: u64,
}

impl RewardTotals {
    pub fn credit(&mut self, grant: RewardPair) {
        self.bonk = self.bonk.saturating_add(u64::from(grant.bonk));
        self.skr = self.skr.saturating_add(u64::from(grant.skr));
    }
}

impl std::fmt::Display for RewardTotals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} BONK, {} SKR", self.bonk, self.skr)
    }
}
