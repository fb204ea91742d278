#![forbid(unsafe_code)]

use std::thread;
use std::time::Duration;

use serde::Serialize;
use sos_engines::record_hash::{record_id_for, RecordHashError};
use sos_kernel_contracts::contact::EmergencyContact;
use sos_kernel_contracts::emergency::{EmergencyRecord, EmergencyType, RecordId};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("emergency services unreachable: {0}")]
    Unreachable(String),
    #[error("ledger rejected record: {0}")]
    Ledger(#[from] RecordHashError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReceipt {
    pub emergency_type: EmergencyType,
    pub location: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationShareReceipt {
    pub location: String,
    pub notified: Vec<String>,
}

/// Outbound side of an activation: the call and the location broadcast.
pub trait EmergencyDispatcher {
    fn call_emergency_services(
        &self,
        emergency_type: EmergencyType,
        location: &str,
    ) -> Result<DispatchReceipt, DispatchError>;

    fn share_location(
        &self,
        contacts: &[EmergencyContact],
        location: &str,
    ) -> Result<LocationShareReceipt, DispatchError>;
}

pub trait EmergencyLedger {
    fn record(&self, record: &EmergencyRecord) -> Result<RecordId, DispatchError>;
}

/// Dispatcher that never leaves the process; it only waits the configured delay.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDispatcher {
    delay: Duration,
}

impl SimulatedDispatcher {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }

    fn wait(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

impl EmergencyDispatcher for SimulatedDispatcher {
    fn call_emergency_services(
        &self,
        emergency_type: EmergencyType,
        location: &str,
    ) -> Result<DispatchReceipt, DispatchError> {
        self.wait();
        info!(%emergency_type, location, "simulated emergency call placed");
        Ok(DispatchReceipt {
            emergency_type,
            location: location.to_string(),
            message: format!("Emergency services notified: {emergency_type} at {location}"),
        })
    }

    fn share_location(
        &self,
        contacts: &[EmergencyContact],
        location: &str,
    ) -> Result<LocationShareReceipt, DispatchError> {
        self.wait();
        let notified: Vec<String> = contacts.iter().map(|c| c.name.clone()).collect();
        info!(location, contacts = notified.len(), "simulated location share");
        Ok(LocationShareReceipt {
            location: location.to_string(),
            notified,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedLedger;

impl EmergencyLedger for SimulatedLedger {
    fn record(&self, record: &EmergencyRecord) -> Result<RecordId, DispatchError> {
        let id = record_id_for(record)?;
        info!(record_id = %id, emergency_type = %record.emergency_type, "emergency recorded");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_dispatch_01_simulated_call_echoes_type_and_location() {
        let d = SimulatedDispatcher::new(0);
        let r = d
            .call_emergency_services(EmergencyType::Allergic, "Gate 12")
            .unwrap();
        assert_eq!(r.emergency_type, EmergencyType::Allergic);
        assert!(r.message.contains("allergic"));
        assert!(r.message.contains("Gate 12"));
    }

    #[test]
    fn at_dispatch_02_location_share_names_every_contact() {
        let contacts = vec![
            EmergencyContact::v1("Mom", "(555)-123-4567").unwrap(),
            EmergencyContact::v1("Ana", "911").unwrap(),
        ];
        let r = SimulatedDispatcher::default()
            .share_location(&contacts, "home")
            .unwrap();
        assert_eq!(r.notified, vec!["Mom".to_string(), "Ana".to_string()]);
    }

    #[test]
    fn at_dispatch_03_ledger_id_is_deterministic() {
        let rec = EmergencyRecord::v1(
            EmergencyType::Drowning,
            42,
            "lake".to_string(),
            vec!["emergency_activation".to_string()],
            "dispatched".to_string(),
            None,
        )
        .unwrap();
        let a = SimulatedLedger.record(&rec).unwrap();
        let b = SimulatedLedger.record(&rec).unwrap();
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("sos_"));
    }
}
