//! Registry configuration.
//!
//! Loaded from environment variables or a YAML/JSON document. Defaults
//! match the deployed registry: one-day epochs, depth-20 groups, and a
//! one-hour grace window for superseded group roots.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vouch_core::Address;
use vouch_crypto::{MAX_DEPTH, MIN_DEPTH};
use vouch_state::{DEFAULT_EPOCH_DURATION_S, DEFAULT_MERKLE_DEPTH, DEFAULT_ROOT_VALIDITY_S};

/// Configuration for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistryConfig {
    /// The only identity allowed to add epochs, groups, and dapps.
    pub owner: Address,
    /// Administrator recorded on every group. Defaults to `owner`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge_admin: Option<Address>,
    /// Validity window of each new epoch, in seconds.
    #[serde(default = "default_epoch_duration_s")]
    pub epoch_duration_s: u64,
    /// Tree depth of groups created implicitly by merkelization.
    #[serde(default = "default_merkle_depth")]
    pub default_merkle_depth: u8,
    /// How long a superseded group root keeps verifying, in seconds.
    #[serde(default = "default_root_validity_s")]
    pub root_validity_s: u64,
}

fn default_epoch_duration_s() -> u64 {
    DEFAULT_EPOCH_DURATION_S
}

fn default_merkle_depth() -> u8 {
    DEFAULT_MERKLE_DEPTH
}

fn default_root_validity_s() -> u64 {
    DEFAULT_ROOT_VALIDITY_S
}

impl RegistryConfig {
    /// Defaults for everything but the owner.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            bridge_admin: None,
            epoch_duration_s: DEFAULT_EPOCH_DURATION_S,
            default_merkle_depth: DEFAULT_MERKLE_DEPTH,
            root_validity_s: DEFAULT_ROOT_VALIDITY_S,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `VOUCH_OWNER` (required, `0x`-prefixed address)
    /// - `VOUCH_BRIDGE_ADMIN` (default: the owner)
    /// - `VOUCH_EPOCH_DURATION_S` (default: 86400)
    /// - `VOUCH_DEFAULT_MERKLE_DEPTH` (default: 20)
    /// - `VOUCH_ROOT_VALIDITY_S` (default: 3600)
    pub fn from_env() -> Result<Self, ConfigError> {
        let owner_raw = std::env::var("VOUCH_OWNER").map_err(|_| ConfigError::MissingOwner)?;
        let owner = Address::from_str(owner_raw.trim())
            .map_err(|e| ConfigError::Invalid("VOUCH_OWNER".into(), e.to_string()))?;

        let bridge_admin = match std::env::var("VOUCH_BRIDGE_ADMIN") {
            Ok(raw) => Some(
                Address::from_str(raw.trim())
                    .map_err(|e| ConfigError::Invalid("VOUCH_BRIDGE_ADMIN".into(), e.to_string()))?,
            ),
            Err(_) => None,
        };

        let config = Self {
            owner,
            bridge_admin,
            epoch_duration_s: env_parse("VOUCH_EPOCH_DURATION_S", DEFAULT_EPOCH_DURATION_S)?,
            default_merkle_depth: env_parse("VOUCH_DEFAULT_MERKLE_DEPTH", DEFAULT_MERKLE_DEPTH)?,
            root_validity_s: env_parse("VOUCH_ROOT_VALIDITY_S", DEFAULT_ROOT_VALIDITY_S)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML (or JSON) document.
    pub fn from_yaml_str(doc: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(doc).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no registry can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.is_zero() {
            return Err(ConfigError::Invalid(
                "owner".into(),
                "the zero address cannot own the registry".into(),
            ));
        }
        if self.bridge_admin.is_some_and(|a| a.is_zero()) {
            return Err(ConfigError::Invalid(
                "bridge_admin".into(),
                "the zero address cannot administer groups".into(),
            ));
        }
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&self.default_merkle_depth) {
            return Err(ConfigError::Invalid(
                "default_merkle_depth".into(),
                format!(
                    "{} is outside {MIN_DEPTH}..={MAX_DEPTH}",
                    self.default_merkle_depth
                ),
            ));
        }
        if self.epoch_duration_s == 0 {
            return Err(ConfigError::Invalid(
                "epoch_duration_s".into(),
                "must be positive".into(),
            ));
        }
        Ok(())
    }

    /// The group administrator in effect.
    pub fn admin(&self) -> Address {
        self.bridge_admin.unwrap_or(self.owner)
    }
}

fn env_parse<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid(var.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("VOUCH_OWNER environment variable is required")]
    MissingOwner,
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
    #[error("failed to parse registry config: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "0x00000000000000000000000000000000000000aa";

    #[test]
    fn yaml_fills_in_defaults() {
        let cfg = RegistryConfig::from_yaml_str(&format!("owner: \"{OWNER}\"\n")).unwrap();
        assert_eq!(cfg.owner.to_hex(), OWNER);
        assert_eq!(cfg.epoch_duration_s, 86_400);
        assert_eq!(cfg.default_merkle_depth, 20);
        assert_eq!(cfg.root_validity_s, 3_600);
        assert_eq!(cfg.admin(), cfg.owner);
    }

    #[test]
    fn json_is_accepted_too() {
        let doc = format!(r#"{{"owner":"{OWNER}","default_merkle_depth":16}}"#);
        let cfg = RegistryConfig::from_yaml_str(&doc).unwrap();
        assert_eq!(cfg.default_merkle_depth, 16);
    }

    #[test]
    fn zero_owner_is_rejected() {
        let cfg = RegistryConfig::new(Address::ZERO);
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(field, _)) if field == "owner"));
    }

    #[test]
    fn depth_out_of_range_is_rejected() {
        let mut cfg = RegistryConfig::new(Address::from_bytes([0xaa; 20]));
        cfg.default_merkle_depth = 0;
        assert!(cfg.validate().is_err());
        cfg.default_merkle_depth = 33;
        assert!(cfg.validate().is_err());
        cfg.default_merkle_depth = 32;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn bridge_admin_overrides_owner() {
        let mut cfg = RegistryConfig::new(Address::from_bytes([0xaa; 20]));
        cfg.bridge_admin = Some(Address::from_bytes([0xbb; 20]));
        assert_eq!(cfg.admin(), Address::from_bytes([0xbb; 20]));
    }

    #[test]
    fn env_parse_uses_default_when_var_absent() {
        let v: u64 = env_parse("VOUCH_NONEXISTENT_VAR_12345", 7).unwrap();
        assert_eq!(v, 7);
    }

    #[test]
    fn env_parse_rejects_garbage() {
        std::env::set_var("VOUCH_TEST_BAD_DEPTH", "deep");
        let result: Result<u8, _> = env_parse("VOUCH_TEST_BAD_DEPTH", 20);
        std::env::remove_var("VOUCH_TEST_BAD_DEPTH");
        assert!(result.is_err());
    }
}
