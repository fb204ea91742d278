#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;

use sos_engines::wake::{WakeConfig, DEFAULT_WAKE_PHRASE};
use sos_kernel_contracts::emergency::{MAX_LOCATION_LEN, MAX_WALLET_ADDRESS_LEN};
use sos_storage::state::default_state_path;

pub const DEFAULT_LOCATION_LABEL: &str = "current location";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be true/false/1/0, got {value:?}")]
    InvalidBool { var: &'static str, value: String },
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be at most {max} characters, got {len}")]
    TooLong {
        var: &'static str,
        max: usize,
        len: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SosConfig {
    pub state_path: PathBuf,
    pub wake_phrase: String,
    pub direct_activation: bool,
    /// Fixed latency the simulated dispatcher waits before answering.
    pub call_delay_ms: u64,
    pub location_label: String,
    pub wallet_address: Option<String>,
}

impl SosConfig {
    pub fn mvp_v1() -> Self {
        Self {
            state_path: default_state_path(),
            wake_phrase: DEFAULT_WAKE_PHRASE.to_string(),
            direct_activation: false,
            call_delay_ms: 0,
            location_label: DEFAULT_LOCATION_LABEL.to_string(),
            wallet_address: None,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` with an explicit variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut cfg = Self::mvp_v1();
        if let Some(path) = get("SOS_STATE_PATH") {
            cfg.state_path = PathBuf::from(path);
        }
        if let Some(phrase) = get("SOS_WAKE_PHRASE") {
            cfg.wake_phrase = phrase;
        }
        if let Some(raw) = get("SOS_DIRECT_ACTIVATION") {
            cfg.direct_activation = parse_bool("SOS_DIRECT_ACTIVATION", &raw)?;
        }
        if let Some(raw) = get("SOS_CALL_DELAY_MS") {
            cfg.call_delay_ms = raw.parse().map_err(|_| ConfigError::InvalidNumber {
                var: "SOS_CALL_DELAY_MS",
                value: raw.clone(),
            })?;
        }
        if let Some(location) = get("SOS_LOCATION") {
            cfg.location_label = check_len("SOS_LOCATION", location, MAX_LOCATION_LEN)?;
        }
        cfg.wallet_address = get("SOS_WALLET_ADDRESS")
            .map(|addr| check_len("SOS_WALLET_ADDRESS", addr, MAX_WALLET_ADDRESS_LEN))
            .transpose()?;
        Ok(cfg)
    }

    pub fn wake_config(&self) -> WakeConfig {
        WakeConfig {
            wake_phrase: self.wake_phrase.clone(),
            direct_activation: self.direct_activation,
        }
    }
}

fn check_len(var: &'static str, value: String, max: usize) -> Result<String, ConfigError> {
    let len = value.chars().count();
    if len > max {
        return Err(ConfigError::TooLong { var, max, len });
    }
    Ok(value)
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn at_config_01_unset_environment_uses_defaults() {
        let cfg = SosConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.wake_phrase, "hey sos");
        assert!(!cfg.direct_activation);
        assert_eq!(cfg.call_delay_ms, 0);
        assert_eq!(cfg.wallet_address, None);
        assert!(cfg.state_path.ends_with("state.json"));
    }

    #[test]
    fn at_config_02_overrides_are_applied() {
        let cfg = SosConfig::from_lookup(lookup(&[
            ("SOS_STATE_PATH", "/tmp/sos/state.json"),
            ("SOS_WAKE_PHRASE", "Help Me"),
            ("SOS_DIRECT_ACTIVATION", "yes"),
            ("SOS_CALL_DELAY_MS", "25"),
            ("SOS_LOCATION", "Pier 39"),
            ("SOS_WALLET_ADDRESS", "  "),
        ]))
        .unwrap();
        assert_eq!(cfg.state_path, PathBuf::from("/tmp/sos/state.json"));
        assert_eq!(cfg.wake_config().wake_phrase, "Help Me");
        assert!(cfg.direct_activation);
        assert_eq!(cfg.call_delay_ms, 25);
        assert_eq!(cfg.location_label, "Pier 39");
        assert_eq!(cfg.wallet_address, None);
    }

    #[test]
    fn at_config_03_malformed_values_are_errors() {
        assert!(matches!(
            SosConfig::from_lookup(lookup(&[("SOS_DIRECT_ACTIVATION", "maybe")])),
            Err(ConfigError::InvalidBool { .. })
        ));
        assert!(matches!(
            SosConfig::from_lookup(lookup(&[("SOS_CALL_DELAY_MS", "-5")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn at_config_04_oversized_location_is_rejected() {
        let long = "l".repeat(MAX_LOCATION_LEN + 1);
        assert_eq!(
            SosConfig::from_lookup(lookup(&[("SOS_LOCATION", long.as_str())])),
            Err(ConfigError::TooLong {
                var: "SOS_LOCATION",
                max: 256,
                len: 257
            })
        );
        let fits = "l".repeat(MAX_LOCATION_LEN);
        let cfg = SosConfig::from_lookup(lookup(&[("SOS_LOCATION", fits.as_str())])).unwrap();
        assert_eq!(cfg.location_label.len(), MAX_LOCATION_LEN);
    }

    #[test]
    fn at_config_05_oversized_wallet_address_is_rejected() {
        let long = "x".repeat(65);
        assert!(matches!(
            SosConfig::from_lookup(lookup(&[("SOS_WALLET_ADDRESS", long.as_str())])),
            Err(ConfigError::TooLong {
                var: "SOS_WALLET_ADDRESS",
                ..
            })
        ));
        let cfg = SosConfig::from_lookup(lookup(&[(
            "SOS_WALLET_ADDRESS",
            "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin",
        )]))
        .unwrap();
        assert!(cfg.wallet_address.is_some());
    }
}
