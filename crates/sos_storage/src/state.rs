#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sos_kernel_contracts::achievement::AchievementId;
use sos_kernel_contracts::contact::EmergencyContact;
use sos_kernel_contracts::emergency::{EmergencyRecord, RecordId};
use sos_kernel_contracts::progress::{CrossAppChallengeId, TrainingModuleId};
use sos_kernel_contracts::reward::{RewardPair, RewardTotals};
use sos_kernel_contracts::{ContractViolation, SchemaVersion, Validate};
use tracing::{debug, info};

pub const STATE_SCHEMA_VERSION: SchemaVersion = SchemaVersion(1);

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("state schema mismatch: found {found}, expected {expected}")]
    SchemaMismatch { found: u32, expected: u32 },
    #[error("contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),
    #[error("duplicate key in {table}: {key}")]
    DuplicateKey { table: &'static str, key: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEmergencyRecord {
    pub record_id: RecordId,
    pub record: EmergencyRecord,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounters {
    pub emergencies_activated: u64,
    pub voice_activations: u64,
}

/// Whole persisted state of the app, written as one JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SosState {
    pub schema_version: SchemaVersion,
    #[serde(default)]
    pub training: BTreeMap<TrainingModuleId, bool>,
    #[serde(default)]
    pub challenges: BTreeMap<CrossAppChallengeId, bool>,
    #[serde(default)]
    pub totals: RewardTotals,
    #[serde(default)]
    pub contacts: Vec<EmergencyContact>,
    #[serde(default)]
    pub emergency_records: Vec<StoredEmergencyRecord>,
    #[serde(default)]
    pub engagement: EngagementCounters,
    #[serde(default)]
    pub achievements: BTreeSet<AchievementId>,
}

impl Default for SosState {
    fn default() -> Self {
        Self {
            schema_version: STATE_SCHEMA_VERSION,
            training: BTreeMap::new(),
            challenges: BTreeMap::new(),
            totals: RewardTotals::default(),
            contacts: Vec::new(),
            emergency_records: Vec::new(),
            engagement: EngagementCounters::default(),
            achievements: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SosStore {
    path: Option<PathBuf>,
    state: SosState,
}

impl SosStore {
    pub fn new_in_memory() -> Self {
        Self::default()
    }

    /// Loads the document at `path`. A missing or blank file starts from defaults.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let state = read_document(&path)?.unwrap_or_default();
        debug!(path = %path.display(), "state opened");
        Ok(Self {
            path: Some(path),
            state,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn state(&self) -> &SosState {
        &self.state
    }

    /// Writes the document back to its file. In-memory stores have nothing to write.
    pub fn save(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let serialized = serde_json::to_vec_pretty(&self.state)?;
        atomic_write(path, &serialized)?;
        debug!(path = %path.display(), "state saved");
        Ok(())
    }

    pub fn is_training_completed(&self, module: TrainingModuleId) -> bool {
        self.state.training.get(&module).copied().unwrap_or(false)
    }

    /// Returns `false` when the module was already completed.
    pub fn mark_training_completed(&mut self, module: TrainingModuleId) -> bool {
        let slot = self.state.training.entry(module).or_insert(false);
        if *slot {
            return false;
        }
        *slot = true;
        info!(module = module.as_str(), "training module completed");
        true
    }

    pub fn training_flags(&self) -> Vec<(TrainingModuleId, bool)> {
        TrainingModuleId::all()
            .iter()
            .map(|m| (*m, self.is_training_completed(*m)))
            .collect()
    }

    pub fn is_challenge_completed(&self, challenge: CrossAppChallengeId) -> bool {
        self.state
            .challenges
            .get(&challenge)
            .copied()
            .unwrap_or(false)
    }

    pub fn mark_challenge_completed(&mut self, challenge: CrossAppChallengeId) -> bool {
        let slot = self.state.challenges.entry(challenge).or_insert(false);
        if *slot {
            return false;
        }
        *slot = true;
        info!(challenge = challenge.as_str(), "cross-app challenge completed");
        true
    }

    pub fn challenge_flags(&self) -> Vec<(CrossAppChallengeId, bool)> {
        CrossAppChallengeId::all()
            .iter()
            .map(|c| (*c, self.is_challenge_completed(*c)))
            .collect()
    }

    pub fn totals(&self) -> RewardTotals {
        self.state.totals
    }

    pub fn credit(&mut self, grant: RewardPair) -> RewardTotals {
        self.state.totals.credit(grant);
        debug!(bonk = grant.bonk, skr = grant.skr, "reward credited");
        self.state.totals
    }

    pub fn add_contact(&mut self, contact: EmergencyContact) -> Result<usize, StorageError> {
        contact.validate()?;
        self.state.contacts.push(contact);
        Ok(self.state.contacts.len())
    }

    pub fn remove_last_contact(&mut self) -> Option<EmergencyContact> {
        self.state.contacts.pop()
    }

    pub fn contacts(&self) -> &[EmergencyContact] {
        &self.state.contacts
    }

    /// Appends once per id and returns `true` when the row is new. Re-appending the
    /// same record is a no-op returning `false`; a different record under an existing
    /// id is rejected.
    pub fn append_emergency_record(
        &mut self,
        record_id: RecordId,
        record: EmergencyRecord,
    ) -> Result<bool, StorageError> {
        record.validate()?;
        if let Some(existing) = self
            .state
            .emergency_records
            .iter()
            .find(|r| r.record_id == record_id)
        {
            if existing.record != record {
                return Err(StorageError::DuplicateKey {
                    table: "emergency_records",
                    key: record_id.to_string(),
                });
            }
            return Ok(false);
        }
        self.state
            .emergency_records
            .push(StoredEmergencyRecord { record_id, record });
        Ok(true)
    }

    pub fn emergency_records(&self) -> &[StoredEmergencyRecord] {
        &self.state.emergency_records
    }

    pub fn engagement(&self) -> EngagementCounters {
        self.state.engagement
    }

    pub fn bump_engagement(&mut self, voice: bool) -> EngagementCounters {
        let counters = &mut self.state.engagement;
        counters.emergencies_activated = counters.emergencies_activated.saturating_add(1);
        if voice {
            counters.voice_activations = counters.voice_activations.saturating_add(1);
        }
        *counters
    }

    pub fn is_achievement_unlocked(&self, id: AchievementId) -> bool {
        self.state.achievements.contains(&id)
    }

    /// Returns `false` when the achievement was already unlocked.
    pub fn unlock_achievement(&mut self, id: AchievementId) -> bool {
        let fresh = self.state.achievements.insert(id);
        if fresh {
            info!(achievement = id.as_str(), "achievement unlocked");
        }
        fresh
    }

    pub fn achievements(&self) -> Vec<AchievementId> {
        self.state.achievements.iter().copied().collect()
    }
}

/// `$XDG_CONFIG_HOME/solana_sos/state.json`, then `$HOME/.config/...`, then a local dir.
pub fn default_state_path() -> PathBuf {
    if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg_config_home)
            .join("solana_sos")
            .join("state.json");
    }
    if let Ok(home) = env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join("solana_sos")
            .join("state.json");
    }
    PathBuf::from(".solana_sos").join("state.json")
}

fn read_document(path: &Path) -> Result<Option<SosState>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let doc = serde_json::from_str::<SosState>(&raw)?;
    if doc.schema_version != STATE_SCHEMA_VERSION {
        return Err(StorageError::SchemaMismatch {
            found: doc.schema_version.0,
            expected: STATE_SCHEMA_VERSION.0,
        });
    }
    validate_rows(&doc)?;
    Ok(Some(doc))
}

/// Rows written by other tools get the same checks the append paths apply.
fn validate_rows(doc: &SosState) -> Result<(), StorageError> {
    for contact in &doc.contacts {
        contact.validate()?;
    }
    let mut seen = BTreeSet::new();
    for row in &doc.emergency_records {
        row.record.validate()?;
        if !seen.insert(&row.record_id) {
            return Err(StorageError::DuplicateKey {
                table: "emergency_records",
                key: row.record_id.to_string(),
            });
        }
    }
    Ok(())
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    let mut tmp = path.to_path_buf();
    tmp.set_extension("tmp");
    fs::write(&tmp, data)?;
    fs::rename(tmp, path)?;
    Ok(())
}
