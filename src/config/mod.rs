//! Operator configuration.
//!
//! A [`RawUserConfig`] is whatever the operator supplied, with every field
//! optional. It is loaded once per activation by [`load_config`] and handed to
//! the policy resolver, which fills the gaps with defaults.

mod loader;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use loader::{
    CONFIG_ENV_VAR, ConfigEnv, ConfigLocations, ConfigSource, DISABLE_ENV_VAR, load_config,
    load_config_with,
};

/// Partially specified sandbox configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUserConfig {
    /// Turn sandboxing off for this activation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesystem: Option<RawFilesystemConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<RawNetworkConfig>,
}

impl RawUserConfig {
    pub fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }
}

/// Filesystem overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFilesystemConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny_read: Option<Vec<PathBuf>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_write: Option<Vec<PathBuf>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny_write: Option<Vec<PathBuf>>,
}

/// Network overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNetworkConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denied_domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_unix_sockets: Option<Vec<PathBuf>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_all_unix_sockets: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_local_binding: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config: RawUserConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RawUserConfig::default());
        assert!(!config.is_disabled());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config: RawUserConfig =
            serde_json::from_str(r#"{"comment": "hi", "network": {"proxy": 1}}"#).unwrap();
        assert_eq!(config.network, Some(RawNetworkConfig::default()));
    }

    #[test]
    fn test_disabled_flag() {
        let config: RawUserConfig = serde_json::from_str(r#"{"disabled": true}"#).unwrap();
        assert!(config.is_disabled());
    }

    #[test]
    fn test_camel_case_fields() {
        let config: RawUserConfig = serde_json::from_str(
            r#"{"filesystem": {"allowWrite": ["/w"]}, "network": {"allowLocalBinding": true}}"#,
        )
        .unwrap();
        assert_eq!(
            config.filesystem.unwrap().allow_write,
            Some(vec![PathBuf::from("/w")])
        );
        assert_eq!(config.network.unwrap().allow_local_binding, Some(true));
    }
}
