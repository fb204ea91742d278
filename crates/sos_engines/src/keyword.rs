#![forbid(unsafe_code)]

use sos_kernel_contracts::emergency::{EmergencyType, KeywordMatch};

/// Linear keyword scan over a transcript.
///
/// The first entry whose keyword occurs in the lowercased transcript wins; there is no
/// severity or confidence ranking.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    table: Vec<(EmergencyType, &'static str)>,
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(EmergencyType::all())
    }
}

impl KeywordMatcher {
    pub fn new(types: &[EmergencyType]) -> Self {
        Self {
            table: types.iter().map(|t| (*t, t.as_keyword())).collect(),
        }
    }

    pub fn detect(&self, transcript: &str) -> Option<KeywordMatch> {
        let lowered = transcript.to_lowercase();
        self.table.iter().find_map(|&(emergency_type, keyword)| {
            lowered.find(keyword).map(|byte_offset| KeywordMatch {
                emergency_type,
                keyword,
                byte_offset,
            })
        })
    }

    /// Every type whose keyword occurs, in table order.
    pub fn detect_all(&self, transcript: &str) -> Vec<EmergencyType> {
        let lowered = transcript.to_lowercase();
        self.table
            .iter()
            .filter(|(_, keyword)| lowered.contains(keyword))
            .map(|(t, _)| *t)
            .collect()
    }
}

pub fn detect_emergency(transcript: &str) -> Option<EmergencyType> {
    KeywordMatcher::default()
        .detect(transcript)
        .map(|m| m.emergency_type)
}
