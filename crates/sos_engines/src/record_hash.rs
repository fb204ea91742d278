#![forbid(unsafe_code)]

use sha2::{Digest, Sha256};
use sos_kernel_contracts::emergency::{EmergencyRecord, RecordId};
use sos_kernel_contracts::ContractViolation;

pub const RECORD_ID_PREFIX: &str = "sos_";
const RECORD_ID_HEX_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum RecordHashError {
    #[error("record encode failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("record id rejected: {0}")]
    Contract(#[from] ContractViolation),
}

/// Deterministic id: `sos_` plus the first 32 hex chars of SHA-256 over the record JSON.
pub fn record_id_for(record: &EmergencyRecord) -> Result<RecordId, RecordHashError> {
    let canonical = serde_json::to_vec(record)?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    let digest = hex::encode(hasher.finalize());
    Ok(RecordId::new(format!(
        "{RECORD_ID_PREFIX}{}",
        &digest[..RECORD_ID_HEX_LEN]
    ))?)
}
