#![forbid(unsafe_code)]

use serde::Serialize;
use sos_engines::achievement::{
    achievement_board, achievement_experience, achievement_for, AchievementTrigger,
};
use sos_kernel_contracts::achievement::{AchievementId, AchievementStatus};
use sos_storage::repo::AchievementRepo;
use sos_storage::state::SosStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementBoard {
    pub achievements: Vec<AchievementStatus>,
    pub unlocked: usize,
    pub experience: u32,
}

/// Unlocks whatever `trigger` maps to. `None` when nothing maps or it was already held.
/// The caller saves the store.
pub fn unlock_for(store: &mut SosStore, trigger: AchievementTrigger) -> Option<AchievementId> {
    let id = achievement_for(trigger)?;
    store.unlock_achievement_row(id).then_some(id)
}

pub fn board(store: &SosStore) -> AchievementBoard {
    let unlocked = store.achievement_rows();
    AchievementBoard {
        achievements: achievement_board(&unlocked),
        unlocked: unlocked.len(),
        experience: achievement_experience(&unlocked),
    }
}
