//! Effective sandbox policy.
//!
//! An [`EffectivePolicy`] is produced once per activation by
//! [`resolve_config`] and is immutable afterwards. Its JSON form (camelCase,
//! `filesystem` / `network` sections) is what the sandbox backend consumes.

pub mod defaults;
mod domains;
mod path_safety;
mod resolver;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use domains::{DomainPattern, DomainRules, HostDecision};
pub use path_safety::{is_safe_write_path, normalize_path};
pub use resolver::{ResolveContext, resolve_config, resolve_config_in};

/// The resolved filesystem and network rules for sandboxed commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePolicy {
    pub filesystem: FilesystemPolicy,
    pub network: NetworkPolicy,
}

/// Filesystem section of the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesystemPolicy {
    /// Read access forbidden, regardless of write permissions.
    pub deny_read: Vec<PathBuf>,
    /// Write access permitted. Deduplicated when inferred.
    pub allow_write: Vec<PathBuf>,
    /// Write access forbidden even under an `allow_write` root.
    pub deny_write: Vec<PathBuf>,
}

/// Network section of the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicy {
    pub allowed_domains: Vec<String>,
    pub denied_domains: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_unix_sockets: Option<Vec<PathBuf>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_all_unix_sockets: Option<bool>,
    pub allow_local_binding: bool,
}

impl NetworkPolicy {
    /// How this policy treats `host`.
    pub fn decide(&self, host: &str) -> HostDecision {
        DomainRules::new(&self.allowed_domains, &self.denied_domains).decide(host)
    }
}
