#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    TrustedNetworkCreated,
    CprCertified,
    FirstAidTrained,
    FirstIntervention,
}

impl AchievementId {
    pub const fn all() -> &'static [Self] {
        &[
            Self::TrustedNetworkCreated,
            Self::CprCertified,
            Self::FirstAidTrained,
            Self::FirstIntervention,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TrustedNetworkCreated => "trusted_network_created",
            Self::CprCertified => "cpr_certified",
            Self::FirstAidTrained => "first_aid_trained",
            Self::FirstIntervention => "first_intervention",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::TrustedNetworkCreated => "Safety Network",
            Self::CprCertified => "CPR Hero",
            Self::FirstAidTrained => "First Aid Expert",
            Self::FirstIntervention => "First Response",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::TrustedNetworkCreated => "Add your first emergency contact",
            Self::CprCertified => "Complete the CPR training module",
            Self::FirstAidTrained => "Complete the first aid training module",
            Self::FirstIntervention => "Activate your first emergency response",
        }
    }

    pub const fn badge(self) -> &'static str {
        match self {
            Self::TrustedNetworkCreated => "👥",
            Self::CprCertified => "💓",
            Self::FirstAidTrained => "🩹",
            Self::FirstIntervention => "🚨",
        }
    }

    pub const fn experience(self) -> u32 {
        match self {
            Self::TrustedNetworkCreated => 100,
            Self::CprCertified => 200,
            Self::FirstAidTrained => 150,
            Self::FirstIntervention => 300,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|a| a.as_str() == normalized)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementStatus {
    pub id: AchievementId,
    pub name: &'static str,
    pub badge: &'static str,
    pub experience: u32,
    pub unlocked: bool,
}
