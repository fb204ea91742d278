#![forbid(unsafe_code)]

use sos_kernel_contracts::achievement::AchievementId;
use sos_kernel_contracts::contact::EmergencyContact;
use sos_kernel_contracts::emergency::{EmergencyRecord, RecordId};
use sos_kernel_contracts::progress::{CrossAppChallengeId, TrainingModuleId};
use sos_kernel_contracts::reward::{RewardPair, RewardTotals};

use crate::state::{EngagementCounters, SosStore, StorageError, StoredEmergencyRecord};

/// Typed repository interface for training module completion flags.
pub trait TrainingProgressRepo {
    fn training_completed_row(&self, module: TrainingModuleId) -> bool;
    fn mark_training_completed_row(&mut self, module: TrainingModuleId) -> bool;
    fn training_flag_rows(&self) -> Vec<(TrainingModuleId, bool)>;
}

/// Typed repository interface for cross-app challenge completion flags.
pub trait CrossAppChallengeRepo {
    fn challenge_completed_row(&self, challenge: CrossAppChallengeId) -> bool;
    fn mark_challenge_completed_row(&mut self, challenge: CrossAppChallengeId) -> bool;
    fn challenge_flag_rows(&self) -> Vec<(CrossAppChallengeId, bool)>;
}

pub trait RewardTotalsRepo {
    fn reward_totals_row(&self) -> RewardTotals;
    fn credit_reward_row(&mut self, grant: RewardPair) -> RewardTotals;
}

pub trait EmergencyContactRepo {
    fn append_contact_row(&mut self, contact: EmergencyContact) -> Result<usize, StorageError>;
    fn remove_last_contact_row(&mut self) -> Option<EmergencyContact>;
    fn contact_rows(&self) -> &[EmergencyContact];
}

/// Append-only emergency history plus the engagement counters that go with it.
pub trait EmergencyRecordRepo {
    /// `Ok(false)` when the same record was already stored under `record_id`.
    fn append_emergency_record_row(
        &mut self,
        record_id: RecordId,
        record: EmergencyRecord,
    ) -> Result<bool, StorageError>;
    fn emergency_record_rows(&self) -> &[StoredEmergencyRecord];
    fn bump_engagement_row(&mut self, voice: bool) -> EngagementCounters;
    fn engagement_row(&self) -> EngagementCounters;
}

pub trait AchievementRepo {
    fn achievement_unlocked_row(&self, id: AchievementId) -> bool;
    fn unlock_achievement_row(&mut self, id: AchievementId) -> bool;
    fn achievement_rows(&self) -> Vec<AchievementId>;
}

impl TrainingProgressRepo for SosStore {
    fn training_completed_row(&self, module: TrainingModuleId) -> bool {
        self.is_training_completed(module)
    }

    fn mark_training_completed_row(&mut self, module: TrainingModuleId) -> bool {
        self.mark_training_completed(module)
    }

    fn training_flag_rows(&self) -> Vec<(TrainingModuleId, bool)> {
        self.training_flags()
    }
}

impl CrossAppChallengeRepo for SosStore {
    fn challenge_completed_row(&self, challenge: CrossAppChallengeId) -> bool {
        self.is_challenge_completed(challenge)
    }

    fn mark_challenge_completed_row(&mut self, challenge: CrossAppChallengeId) -> bool {
        self.mark_challenge_completed(challenge)
    }

    fn challenge_flag_rows(&self) -> Vec<(CrossAppChallengeId, bool)> {
        self.challenge_flags()
    }
}

impl RewardTotalsRepo for SosStore {
    fn reward_totals_row(&self) -> RewardTotals {
        self.totals()
    }

    fn credit_reward_row(&mut self, grant: RewardPair) -> RewardTotals {
        self.credit(grant)
    }
}

impl EmergencyContactRepo for SosStore {
    fn append_contact_row(&mut self, contact: EmergencyContact) -> Result<usize, StorageError> {
        self.add_contact(contact)
    }

    fn remove_last_contact_row(&mut self) -> Option<EmergencyContact> {
        self.remove_last_contact()
    }

    fn contact_rows(&self) -> &[EmergencyContact] {
        self.contacts()
    }
}

impl EmergencyRecordRepo for SosStore {
    fn append_emergency_record_row(
        &mut self,
        record_id: RecordId,
        record: EmergencyRecord,
    ) -> Result<bool, StorageError> {
        self.append_emergency_record(record_id, record)
    }

    fn emergency_record_rows(&self) -> &[StoredEmergencyRecord] {
        self.emergency_records()
    }

    fn bump_engagement_row(&mut self, voice: bool) -> EngagementCounters {
        self.bump_engagement(voice)
    }

    fn engagement_row(&self) -> EngagementCounters {
        self.engagement()
    }
}

impl AchievementRepo for SosStore {
    fn achievement_unlocked_row(&self, id: AchievementId) -> bool {
        self.is_achievement_unlocked(id)
    }

    fn unlock_achievement_row(&mut self, id: AchievementId) -> bool {
        self.unlock_achievement(id)
    }

    fn achievement_rows(&self) -> Vec<AchievementId> {
        self.achievements()
    }
}
