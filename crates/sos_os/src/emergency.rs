#![forbid(unsafe_code)]

use serde::Serialize;
use sos_engines::achievement::AchievementTrigger;
use sos_engines::instructions::instructions_for;
use sos_engines::keyword::KeywordMatcher;
use sos_engines::record_hash::{record_id_for, RecordHashError};
use sos_engines::reward::{calculate, RewardQuote};
use sos_engines::wake::{WakeOutcome, WakeSession};
use sos_kernel_contracts::achievement::AchievementId;
use sos_kernel_contracts::emergency::{EmergencyRecord, EmergencyType, RecordId};
use sos_kernel_contracts::reward::{RewardAction, RewardTotals};
use sos_kernel_contracts::ContractViolation;
use sos_storage::repo::{EmergencyContactRepo, EmergencyRecordRepo, RewardTotalsRepo};
use sos_storage::state::{SosStore, StorageError};
use tracing::{info, warn};

use crate::achievements::unlock_for;
use crate::config::SosConfig;
use crate::dispatch::{
    DispatchReceipt, EmergencyDispatcher, EmergencyLedger, LocationShareReceipt,
    SimulatedDispatcher, SimulatedLedger,
};

pub const MANUAL_ACTIVATION_ACTION: &str = "manual_activation";
const PENDING_OUTCOME: &str = "in progress";

#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    #[error("no emergency detected")]
    NoEmergencyDetected,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid emergency record: {0}")]
    ContractViolation(#[from] ContractViolation),
    #[error(transparent)]
    RecordHash(#[from] RecordHashError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationSource {
    Voice,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivationOutcome {
    pub emergency_type: EmergencyType,
    pub instructions: Vec<String>,
    pub call: Option<DispatchReceipt>,
    pub location_share: Option<LocationShareReceipt>,
    /// Ledger id; `None` when the ledger could not be reached.
    pub record_id: Option<RecordId>,
    /// `false` when an identical record was already stored; nothing is credited then.
    pub newly_recorded: bool,
    pub reward: RewardQuote,
    pub totals: RewardTotals,
    pub unlocked: Option<AchievementId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceOutcome {
    Ignored,
    WakeDetected,
    NotRecognized,
    Activated(Box<ActivationOutcome>),
}

#[derive(Debug, Clone)]
pub struct EmergencyRuntime<D, L>
where
    D: EmergencyDispatcher,
    L: EmergencyLedger,
{
    location_label: String,
    wallet_address: Option<String>,
    matcher: KeywordMatcher,
    dispatcher: D,
    ledger: L,
}

impl EmergencyRuntime<SimulatedDispatcher, SimulatedLedger> {
    pub fn simulated(config: &SosConfig) -> Self {
        Self::new(
            config,
            SimulatedDispatcher::new(config.call_delay_ms),
            SimulatedLedger,
        )
    }
}

impl<D, L> EmergencyRuntime<D, L>
where
    D: EmergencyDispatcher,
    L: EmergencyLedger,
{
    pub fn new(config: &SosConfig, dispatcher: D, ledger: L) -> Self {
        Self {
            location_label: config.location_label.clone(),
            wallet_address: config.wallet_address.clone(),
            matcher: KeywordMatcher::default(),
            dispatcher,
            ledger,
        }
    }

    /// Matches a spoken transcript and activates on the first keyword hit.
    pub fn activate_transcript(
        &self,
        store: &mut SosStore,
        transcript: &str,
        now_unix_ms: u64,
    ) -> Result<ActivationOutcome, ActivationError> {
        let Some(m) = self.matcher.detect(transcript) else {
            return Err(ActivationError::NoEmergencyDetected);
        };
        self.activate(store, m.emergency_type, ActivationSource::Voice, now_unix_ms)
    }

    pub fn activate(
        &self,
        store: &mut SosStore,
        emergency_type: EmergencyType,
        source: ActivationSource,
        now_unix_ms: u64,
    ) -> Result<ActivationOutcome, ActivationError> {
        let location = self.location_label.as_str();
        // Config-derived fields are checked before any collaborator is contacted.
        let pending = EmergencyRecord::v1(
            emergency_type,
            now_unix_ms,
            location.to_string(),
            vec![RewardAction::EmergencyActivation.as_tag().to_string()],
            PENDING_OUTCOME.to_string(),
            self.wallet_address.clone(),
        )?;
        let instructions: Vec<String> = instructions_for(emergency_type)
            .iter()
            .map(|s| s.to_string())
            .collect();

        let call = match self
            .dispatcher
            .call_emergency_services(emergency_type, location)
        {
            Ok(receipt) => Some(receipt),
            Err(err) => {
                warn!(%emergency_type, error = %err, "emergency call failed");
                None
            }
        };
        let location_share = match self
            .dispatcher
            .share_location(store.contact_rows(), location)
        {
            Ok(receipt) => Some(receipt),
            Err(err) => {
                warn!(error = %err, "location share failed");
                None
            }
        };

        let mut actions = pending.actions.clone();
        actions.push(match source {
            ActivationSource::Voice => RewardAction::VoiceRecognition.as_tag().to_string(),
            ActivationSource::Manual => MANUAL_ACTIVATION_ACTION.to_string(),
        });
        if location_share.is_some() {
            actions.push(RewardAction::LocationSharing.as_tag().to_string());
        }
        let outcome = if call.is_some() {
            "emergency services notified"
        } else {
            "emergency call failed"
        };
        let record = EmergencyRecord {
            actions,
            outcome: outcome.to_string(),
            ..pending
        };

        let record_id = match self.ledger.record(&record) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(%emergency_type, error = %err, "ledger record failed");
                None
            }
        };
        let local_id = match &record_id {
            Some(id) => id.clone(),
            None => record_id_for(&record)?,
        };
        let newly_recorded = store.append_emergency_record_row(local_id, record)?;

        let reward = calculate(
            emergency_type.as_keyword(),
            RewardAction::EmergencyActivation.as_tag(),
        );
        let (totals, unlocked) = if newly_recorded {
            let totals = store.credit_reward_row(reward.total);
            store.bump_engagement_row(source == ActivationSource::Voice);
            let unlocked = unlock_for(store, AchievementTrigger::EmergencyActivated);
            store.save()?;
            info!(
                %emergency_type,
                bonk = reward.total.bonk,
                skr = reward.total.skr,
                recorded = record_id.is_some(),
                "emergency activated"
            );
            (totals, unlocked)
        } else {
            warn!(%emergency_type, now_unix_ms, "activation already recorded, no reward");
            (store.reward_totals_row(), None)
        };
        Ok(ActivationOutcome {
            emergency_type,
            instructions,
            call,
            location_share,
            record_id,
            newly_recorded,
            reward,
            totals,
            unlocked,
        })
    }

    /// Feeds one transcript through the wake session. After an activation the session
    /// is reset so the next utterance starts from idle.
    pub fn handle_voice(
        &self,
        session: &mut WakeSession,
        store: &mut SosStore,
        transcript: &str,
        now_unix_ms: u64,
    ) -> Result<VoiceOutcome, ActivationError> {
        match session.step(transcript) {
            WakeOutcome::Ignored => Ok(VoiceOutcome::Ignored),
            WakeOutcome::WakeDetected => Ok(VoiceOutcome::WakeDetected),
            WakeOutcome::NotRecognized => Ok(VoiceOutcome::NotRecognized),
            WakeOutcome::Activated(m) => {
                let outcome =
                    self.activate(store, m.emergency_type, ActivationSource::Voice, now_unix_ms);
                session.reset();
                Ok(VoiceOutcome::Activated(Box::new(outcome?)))
            }
        }
    }
}
