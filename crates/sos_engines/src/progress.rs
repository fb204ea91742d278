#![forbid(unsafe_code)]

use sos_kernel_contracts::progress::{HeroLevel, NextLevel, ProgressReport, MAX_HERO_LEVEL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressConfig {
    pub experience_per_completion: u32,
    /// Experience at which each level starts; index 0 is level 1.
    pub level_thresholds: Vec<u32>,
}

impl ProgressConfig {
    pub fn mvp_v1() -> Self {
        Self {
            experience_per_completion: 250,
            level_thresholds: vec![0, 250, 500, 750, 1000],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgressAggregator {
    config: ProgressConfig,
}

impl Default for ProgressAggregator {
    fn default() -> Self {
        Self::new(ProgressConfig::mvp_v1())
    }
}

impl ProgressAggregator {
    pub fn new(config: ProgressConfig) -> Self {
        Self { config }
    }

    pub fn aggregate<I>(&self, flags: I) -> ProgressReport
    where
        I: IntoIterator<Item = bool>,
    {
        let (completed, total) = flags.into_iter().fold((0u32, 0u32), |(c, t), done| {
            (c.saturating_add(u32::from(done)), t.saturating_add(1))
        });
        let percent = if total == 0 {
            0
        } else {
            (u64::from(completed) * 100 / u64::from(total)) as u32
        };
        let experience = completed.saturating_mul(self.config.experience_per_completion);
        let level = self.level_for(experience);
        let next_level = if level.is_max() {
            NextLevel::MaximumReached
        } else {
            self.config
                .level_thresholds
                .get(usize::from(level.get()))
                .copied()
                .map(NextLevel::Threshold)
                .unwrap_or(NextLevel::MaximumReached)
        };
        ProgressReport {
            completed,
            total,
            percent,
            experience,
            level,
            next_level,
        }
    }

    pub fn level_for(&self, experience: u32) -> HeroLevel {
        let reached = self
            .config
            .level_thresholds
            .iter()
            .take(usize::from(MAX_HERO_LEVEL))
            .filter(|t| experience >= **t)
            .count()
            .max(1);
        HeroLevel::new(reached as u8).unwrap_or(HeroLevel::MIN)
    }
}
