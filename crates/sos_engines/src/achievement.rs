#![forbid(unsafe_code)]

use sos_kernel_contracts::achievement::{AchievementId, AchievementStatus};
use sos_kernel_contracts::progress::TrainingModuleId;

/// Things the runtimes report that can unlock an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementTrigger {
    ContactAdded,
    TrainingCompleted(TrainingModuleId),
    EmergencyActivated,
}

pub fn achievement_for(trigger: AchievementTrigger) -> Option<AchievementId> {
    match trigger {
        AchievementTrigger::ContactAdded => Some(AchievementId::TrustedNetworkCreated),
        AchievementTrigger::TrainingCompleted(TrainingModuleId::Cpr) => {
            Some(AchievementId::CprCertified)
        }
        AchievementTrigger::TrainingCompleted(TrainingModuleId::FirstAid) => {
            Some(AchievementId::FirstAidTrained)
        }
        AchievementTrigger::TrainingCompleted(_) => None,
        AchievementTrigger::EmergencyActivated => Some(AchievementId::FirstIntervention),
    }
}

/// Full catalog in declaration order, flagged against the unlocked set.
pub fn achievement_board(unlocked: &[AchievementId]) -> Vec<AchievementStatus> {
    AchievementId::all()
        .iter()
        .map(|id| AchievementStatus {
            id: *id,
            name: id.display_name(),
            badge: id.badge(),
            experience: id.experience(),
            unlocked: unlocked.contains(id),
        })
        .collect()
}

pub fn achievement_experience(unlocked: &[AchievementId]) -> u32 {
    unlocked
        .iter()
        .fold(0u32, |acc, id| acc.saturating_add(id.experience()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_achievement_01_only_cpr_and_first_aid_modules_unlock() {
        assert_eq!(
            achievement_for(AchievementTrigger::TrainingCompleted(TrainingModuleId::Cpr)),
            Some(AchievementId::CprCertified)
        );
        assert_eq!(
            achievement_for(AchievementTrigger::TrainingCompleted(
                TrainingModuleId::FirstAid
            )),
            Some(AchievementId::FirstAidTrained)
        );
        assert_eq!(
            achievement_for(AchievementTrigger::TrainingCompleted(TrainingModuleId::Voice)),
            None
        );
        assert_eq!(
            achievement_for(AchievementTrigger::ContactAdded),
            Some(AchievementId::TrustedNetworkCreated)
        );
    }

    #[test]
    fn at_achievement_02_board_lists_every_entry_and_sums_unlocked_xp() {
        let unlocked = [AchievementId::FirstIntervention, AchievementId::CprCertified];
        let board = achievement_board(&unlocked);
        assert_eq!(board.len(), AchievementId::all().len());
        assert_eq!(board.iter().filter(|s| s.unlocked).count(), 2);
        assert!(!board[0].unlocked);
        assert_eq!(achievement_experience(&unlocked), 500);
        assert_eq!(achievement_experience(&[]), 0);
    }
}
