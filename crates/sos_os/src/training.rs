#![forbid(unsafe_code)]

use serde::Serialize;
use sos_engines::achievement::AchievementTrigger;
use sos_engines::progress::ProgressAggregator;
use sos_engines::reward::{challenge_reward, training_reward};
use sos_kernel_contracts::achievement::AchievementId;
use sos_kernel_contracts::progress::{CrossAppChallengeId, ProgressReport, TrainingModuleId};
use sos_kernel_contracts::reward::{RewardPair, RewardTotals};
use sos_storage::repo::{CrossAppChallengeRepo, RewardTotalsRepo, TrainingProgressRepo};
use sos_storage::state::{SosStore, StorageError};
use tracing::info;

use crate::achievements::unlock_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionOutcome {
    pub newly_completed: bool,
    /// Zero when the item had already been completed.
    pub reward: RewardPair,
    pub totals: RewardTotals,
    pub progress: ProgressReport,
    pub unlocked: Option<AchievementId>,
}

#[derive(Debug, Clone, Default)]
pub struct TrainingRuntime {
    aggregator: ProgressAggregator,
}

impl TrainingRuntime {
    pub fn new(aggregator: ProgressAggregator) -> Self {
        Self { aggregator }
    }

    pub fn complete_module(
        &self,
        store: &mut SosStore,
        module: TrainingModuleId,
    ) -> Result<CompletionOutcome, StorageError> {
        let newly_completed = store.mark_training_completed_row(module);
        let (reward, unlocked) = if newly_completed {
            (
                training_reward(module),
                unlock_for(store, AchievementTrigger::TrainingCompleted(module)),
            )
        } else {
            (RewardPair::ZERO, None)
        };
        let totals = self.grant(store, reward)?;
        if newly_completed {
            info!(
                module = module.as_str(),
                bonk = reward.bonk,
                skr = reward.skr,
                "training reward granted"
            );
        }
        Ok(CompletionOutcome {
            newly_completed,
            reward,
            totals,
            progress: self.training_progress(store),
            unlocked,
        })
    }

    pub fn complete_challenge(
        &self,
        store: &mut SosStore,
        challenge: CrossAppChallengeId,
    ) -> Result<CompletionOutcome, StorageError> {
        let newly_completed = store.mark_challenge_completed_row(challenge);
        let reward = if newly_completed {
            challenge_reward(challenge)
        } else {
            RewardPair::ZERO
        };
        let totals = self.grant(store, reward)?;
        if newly_completed {
            info!(
                challenge = challenge.as_str(),
                bonk = reward.bonk,
                skr = reward.skr,
                "challenge reward granted"
            );
        }
        Ok(CompletionOutcome {
            newly_completed,
            reward,
            totals,
            progress: self.challenge_progress(store),
            unlocked: None,
        })
    }

    pub fn training_progress(&self, store: &SosStore) -> ProgressReport {
        self.aggregator
            .aggregate(store.training_flag_rows().into_iter().map(|(_, done)| done))
    }

    pub fn challenge_progress(&self, store: &SosStore) -> ProgressReport {
        self.aggregator
            .aggregate(store.challenge_flag_rows().into_iter().map(|(_, done)| done))
    }

    fn grant(
        &self,
        store: &mut SosStore,
        reward: RewardPair,
    ) -> Result<RewardTotals, StorageError> {
        if reward.is_zero() {
            return Ok(store.reward_totals_row());
        }
        let totals = store.credit_reward_row(reward);
        store.save()?;
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sos_kernel_contracts::progress::NextLevel;

    #[test]
    fn at_training_rt_01_first_completion_grants_and_repeats_do_not() {
        let rt = TrainingRuntime::default();
        let mut store = SosStore::new_in_memory();

        let first = rt.complete_module(&mut store, TrainingModuleId::Cpr).unwrap();
        assert!(first.newly_completed);
        assert_eq!(first.reward, RewardPair::new(50, 25));
        assert_eq!(first.totals.bonk, 50);
        assert_eq!(first.progress.percent, 20);
        assert_eq!(first.progress.level.get(), 2);
        assert_eq!(first.unlocked, Some(AchievementId::CprCertified));

        let again = rt.complete_module(&mut store, TrainingModuleId::Cpr).unwrap();
        assert!(!again.newly_completed);
        assert_eq!(again.reward, RewardPair::ZERO);
        assert_eq!(again.totals, first.totals);
        assert_eq!(again.unlocked, None);
    }

    #[test]
    fn at_training_rt_02_all_modules_reach_max_level() {
        let rt = TrainingRuntime::default();
        let mut store = SosStore::new_in_memory();
        let mut last = None;
        for m in TrainingModuleId::all() {
            last = Some(rt.complete_module(&mut store, *m).unwrap());
        }
        let last = last.unwrap();
        assert_eq!(last.progress.completed, 5);
        assert_eq!(last.progress.percent, 100);
        assert_eq!(last.progress.next_level, NextLevel::MaximumReached);
        assert_eq!(last.totals, RewardTotals { bonk: 165, skr: 80 });
    }

    #[test]
    fn at_training_rt_03_challenges_track_separately_from_modules() {
        let rt = TrainingRuntime::default();
        let mut store = SosStore::new_in_memory();
        let out = rt
            .complete_challenge(&mut store, CrossAppChallengeId::SafetyTrading)
            .unwrap();
        assert_eq!(out.reward, RewardPair::new(120, 60));
        assert_eq!(out.progress.completed, 1);
        assert_eq!(rt.training_progress(&store).completed, 0);
        assert_eq!(rt.challenge_progress(&store).experience, 250);
    }
}
