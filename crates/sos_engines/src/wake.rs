#![forbid(unsafe_code)]

use sos_kernel_contracts::emergency::KeywordMatch;
use tracing::debug;

use crate::keyword::KeywordMatcher;

pub const DEFAULT_WAKE_PHRASE: &str = "hey sos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeState {
    Idle,
    AwaitingEmergency,
    Activated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeConfig {
    pub wake_phrase: String,
    /// Allow a keyword to activate straight from `Idle` without the wake phrase.
    pub direct_activation: bool,
}

impl WakeConfig {
    pub fn mvp_v1() -> Self {
        Self {
            wake_phrase: DEFAULT_WAKE_PHRASE.to_string(),
            direct_activation: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakeOutcome {
    /// Transcript ignored in the current state.
    Ignored,
    WakeDetected,
    NotRecognized,
    Activated(KeywordMatch),
}

#[derive(Debug, Clone)]
pub struct WakeSession {
    config: WakeConfig,
    matcher: KeywordMatcher,
    state: WakeState,
}

impl WakeSession {
    pub fn new(config: WakeConfig) -> Self {
        Self {
            config: WakeConfig {
                wake_phrase: config.wake_phrase.trim().to_lowercase(),
                ..config
            },
            matcher: KeywordMatcher::default(),
            state: WakeState::Idle,
        }
    }

    pub fn state(&self) -> WakeState {
        self.state
    }

    pub fn reset(&mut self) {
        self.transition(WakeState::Idle);
    }

    pub fn step(&mut self, transcript: &str) -> WakeOutcome {
        let lowered = transcript.to_lowercase();
        match self.state {
            WakeState::Idle => {
                if self.config.direct_activation {
                    if let Some(m) = self.matcher.detect(&lowered) {
                        self.transition(WakeState::Activated);
                        return WakeOutcome::Activated(m);
                    }
                }
                if !self.config.wake_phrase.is_empty() && lowered.contains(&self.config.wake_phrase)
                {
                    // "hey sos, drowning" carries the keyword in the same utterance.
                    let after_wake = lowered
                        .find(&self.config.wake_phrase)
                        .map(|i| &lowered[i + self.config.wake_phrase.len()..])
                        .unwrap_or("");
                    if let Some(m) = self.matcher.detect(after_wake) {
                        self.transition(WakeState::Activated);
                        return WakeOutcome::Activated(m);
                    }
                    self.transition(WakeState::AwaitingEmergency);
                    return WakeOutcome::WakeDetected;
                }
                WakeOutcome::Ignored
            }
            WakeState::AwaitingEmergency => match self.matcher.detect(&lowered) {
                Some(m) => {
                    self.transition(WakeState::Activated);
                    WakeOutcome::Activated(m)
                }
                None => WakeOutcome::NotRecognized,
            },
            WakeState::Activated => WakeOutcome::Ignored,
        }
    }

    fn transition(&mut self, to: WakeState) {
        if self.state != to {
            debug!(from = ?self.state, to = ?to, "wake session transition");
            self.state = to;
        }
    }
}
