#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::validate_text;
use crate::{ContractViolation, Validate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

impl EmergencyContact {
    pub fn v1(name: impl Into<String>, phone: impl Into<String>) -> Result<Self, ContractViolation> {
        let contact = Self {
            name: name.into().trim().to_string(),
            phone: phone.into().trim().to_string(),
        };
        contact.validate()?;
        Ok(contact)
    }
}

impl Validate for EmergencyContact {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text("emergency_contact.name", &self.name, 64)?;
        validate_text("emergency_contact.phone", &self.phone, 32)?;
        if !self.phone.chars().any(|c| c.is_ascii_digit()) {
            return Err(ContractViolation::InvalidValue {
                field: "emergency_contact.phone",
                reason: "must contain at least one digit",
            });
        }
        Ok(())
    }
}

/// Formats North American numbers as `(AAA)-BBB-CCCC`.
///
/// Anything that is not 10 digits, or 11 digits with a leading `1`, is returned unchanged.
pub fn format_phone_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let local = match digits.len() {
        10 => digits.as_str(),
        11 if digits.starts_with('1') => &digits[1..],
        _ => return raw.to_string(),
    };
    format!("({})-{}-{}", &local[0..3], &local[3..6], &local[6..])
}
