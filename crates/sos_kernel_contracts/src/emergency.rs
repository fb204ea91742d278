#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::validate_text;
use crate::{ContractViolation, SchemaVersion, Validate};

pub const EMERGENCY_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

pub const MAX_RECORD_ACTIONS: usize = 16;
pub const MAX_LOCATION_LEN: usize = 256;
pub const MAX_WALLET_ADDRESS_LEN: usize = 64;

/// Crisis categories the matcher can recognize.
///
/// Declaration order is the scan order: when a transcript contains several
/// keywords, the variant declared first wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EmergencyType {
    #[serde(rename = "drowning")]
    Drowning,
    #[serde(rename = "heart attack")]
    HeartAttack,
    #[serde(rename = "choking")]
    Choking,
    #[serde(rename = "bleeding")]
    Bleeding,
    #[serde(rename = "unconscious")]
    Unconscious,
    #[serde(rename = "stroke")]
    Stroke,
    #[serde(rename = "seizure")]
    Seizure,
    #[serde(rename = "poisoning")]
    Poisoning,
    #[serde(rename = "burn")]
    Burn,
    #[serde(rename = "diabetic")]
    Diabetic,
    #[serde(rename = "allergic")]
    Allergic,
    #[serde(rename = "trauma")]
    Trauma,
    #[serde(rename = "suicide")]
    Suicide,
    #[serde(rename = "overdose")]
    Overdose,
    #[serde(rename = "hypothermia")]
    Hypothermia,
}

impl EmergencyType {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Drowning,
            Self::HeartAttack,
            Self::Choking,
            Self::Bleeding,
            Self::Unconscious,
            Self::Stroke,
            Self::Seizure,
            Self::Poisoning,
            Self::Burn,
            Self::Diabetic,
            Self::Allergic,
            Self::Trauma,
            Self::Suicide,
            Self::Overdose,
            Self::Hypothermia,
        ]
    }

    pub const fn as_keyword(self) -> &'static str {
        match self {
            Self::Drowning => "drowning",
            Self::HeartAttack => "heart attack",
            Self::Choking => "choking",
            Self::Bleeding => "bleeding",
            Self::Unconscious => "unconscious",
            Self::Stroke => "stroke",
            Self::Seizure => "seizure",
            Self::Poisoning => "poisoning",
            Self::Burn => "burn",
            Self::Diabetic => "diabetic",
            Self::Allergic => "allergic",
            Self::Trauma => "trauma",
            Self::Suicide => "suicide",
            Self::Overdose => "overdose",
            Self::Hypothermia => "hypothermia",
        }
    }

    /// Exact keyword lookup. Accepts `heart_attack` as well as `heart attack`.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('_', " ");
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_keyword() == normalized)
    }

    pub fn allowed_keywords() -> Vec<&'static str> {
        Self::all().iter().map(|t| t.as_keyword()).collect()
    }
}

impl std::fmt::Display for EmergencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordMatch {
    pub emergency_type: EmergencyType,
    pub keyword: &'static str,
    /// Byte offset of the keyword inside the lowercased transcript.
    pub byte_offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Result<Self, ContractViolation> {
        let id = id.into();
        validate_text("record_id", &id, 128)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecordId {
    type Error = ContractViolation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyRecord {
    pub schema_version: SchemaVersion,
    pub emergency_type: EmergencyType,
    pub timestamp_unix_ms: u64,
    pub location: String,
    pub actions: Vec<String>,
    pub outcome: String,
    pub wallet_address: Option<String>,
}

impl EmergencyRecord {
    pub fn v1(
        emergency_type: EmergencyType,
        timestamp_unix_ms: u64,
        location: String,
        actions: Vec<String>,
        outcome: String,
        wallet_address: Option<String>,
    ) -> Result<Self, ContractViolation> {
        let rec = Self {
            schema_version: EMERGENCY_CONTRACT_VERSION,
            emergency_type,
            timestamp_unix_ms,
            location,
            actions,
            outcome,
            wallet_address,
        };
        rec.validate()?;
        Ok(rec)
    }
}

impl Validate for EmergencyRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.schema_version != EMERGENCY_CONTRACT_VERSION {
            return Err(ContractViolation::InvalidValue {
                field: "emergency_record.schema_version",
                reason: "must match EMERGENCY_CONTRACT_VERSION",
            });
        }
        validate_text(
            "emergency_record.location",
            &self.location,
            MAX_LOCATION_LEN,
        )?;
        validate_text("emergency_record.outcome", &self.outcome, 256)?;
        if self.actions.len() > MAX_RECORD_ACTIONS {
            return Err(ContractViolation::InvalidValue {
                field: "emergency_record.actions",
                reason: "must contain <= 16 entries",
            });
        }
        for action in &self.actions {
            validate_text("emergency_record.actions[]", action, 64)?;
        }
        if let Some(addr) = &self.wallet_address {
            validate_text(
                "emergency_record.wallet_address",
                addr,
                MAX_WALLET_ADDRESS_LEN,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_emergency_01_keywords_parse_back_to_their_type() {
        for t in EmergencyType::all() {
            assert_eq!(EmergencyType::parse(t.as_keyword()), Some(*t));
        }
        assert_eq!(
            EmergencyType::parse("  Heart_Attack "),
            Some(EmergencyType::HeartAttack)
        );
        assert_eq!(EmergencyType::parse("flood"), None);
    }

    #[test]
    fn at_emergency_02_serde_uses_keyword_form() {
        let json = serde_json::to_string(&EmergencyType::HeartAttack).unwrap();
        assert_eq!(json, "\"heart attack\"");
        let back: EmergencyType = serde_json::from_str("\"hypothermia\"").unwrap();
        assert_eq!(back, EmergencyType::Hypothermia);
    }

    #[test]
    fn at_emergency_03_record_rejects_blank_location_and_too_many_actions() {
        let err = EmergencyRecord::v1(
            EmergencyType::Burn,
            1,
            "   ".to_string(),
            vec![],
            "In Progress".to_string(),
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ContractViolation::InvalidValue {
                field: "emergency_record.location",
                ..
            }
        ));

        let actions = (0..17).map(|i| format!("a{i}")).collect();
        assert!(EmergencyRecord::v1(
            EmergencyType::Burn,
            1,
            "here".to_string(),
            actions,
            "In Progress".to_string(),
            None,
        )
        .is_err());
    }

    #[test]
    fn at_emergency_04_record_id_must_not_be_empty() {
        assert!(RecordId::new("").is_err());
        assert_eq!(RecordId::new("sos_abc").unwrap().as_str(), "sos_abc");
        assert!(serde_json::from_str::<RecordId>("\"  \"").is_err());
        let id: RecordId = serde_json::from_str("\"sos_abc\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"sos_abc\"");
    }
}
