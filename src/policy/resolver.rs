//! Merges user overrides over computed defaults.
//!
//! Merging is per field, one level into `filesystem` and `network`: any field
//! the user supplied is taken verbatim, every field they left out gets its
//! default. There is no deep merge of list contents.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::defaults::{DEFAULT_DENY_READ, default_allowed_domains};
use super::path_safety::{is_safe_write_path, normalize_path};
use super::{EffectivePolicy, FilesystemPolicy, NetworkPolicy};
use crate::config::{RawFilesystemConfig, RawNetworkConfig, RawUserConfig};

/// Host locations the resolver depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveContext {
    pub home_dir: PathBuf,
    pub temp_dir: PathBuf,
}

impl ResolveContext {
    /// Home and temp directories of the current process.
    pub fn from_process() -> Self {
        Self {
            home_dir: dirs::home_dir().unwrap_or_else(|| PathBuf::from("/")),
            temp_dir: std::env::temp_dir(),
        }
    }
}

/// Resolve the effective policy for a project using this process's home and
/// temp directories.
pub fn resolve_config(
    project_dir: impl AsRef<Path>,
    worktree_dir: impl AsRef<Path>,
    user: Option<&RawUserConfig>,
) -> EffectivePolicy {
    resolve_config_in(
        &ResolveContext::from_process(),
        project_dir.as_ref(),
        worktree_dir.as_ref(),
        user,
    )
}

/// Resolve the effective policy against an explicit [`ResolveContext`].
pub fn resolve_config_in(
    ctx: &ResolveContext,
    project_dir: &Path,
    worktree_dir: &Path,
    user: Option<&RawUserConfig>,
) -> EffectivePolicy {
    let fs = user.and_then(|u| u.filesystem.as_ref());
    let net = user.and_then(|u| u.network.as_ref());

    EffectivePolicy {
        filesystem: resolve_filesystem(ctx, project_dir, worktree_dir, fs),
        network: resolve_network(net),
    }
}

fn resolve_filesystem(
    ctx: &ResolveContext,
    project_dir: &Path,
    worktree_dir: &Path,
    user: Option<&RawFilesystemConfig>,
) -> FilesystemPolicy {
    let deny_read = user
        .and_then(|fs| fs.deny_read.clone())
        .unwrap_or_else(|| {
            DEFAULT_DENY_READ
                .iter()
                .map(|p| ctx.home_dir.join(p))
                .collect()
        });

    // Explicit allowWrite is trusted as-is, even "/".
    let allow_write = match user.and_then(|fs| fs.allow_write.clone()) {
        Some(paths) => paths,
        None => inferred_write_roots(&[project_dir, worktree_dir, &ctx.temp_dir]),
    };

    let deny_write = user
        .and_then(|fs| fs.deny_write.clone())
        .unwrap_or_default();

    FilesystemPolicy {
        deny_read,
        allow_write,
        deny_write,
    }
}

/// Drop empty and unsafe candidates, then dedupe by normalized path keeping
/// first-seen order.
fn inferred_write_roots(candidates: &[&Path]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|p| !p.as_os_str().is_empty())
        .filter(|p| is_safe_write_path(p))
        .map(|p| normalize_path(p))
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

fn resolve_network(user: Option<&RawNetworkConfig>) -> NetworkPolicy {
    NetworkPolicy {
        allowed_domains: user
            .and_then(|n| n.allowed_domains.clone())
            .unwrap_or_else(default_allowed_domains),
        denied_domains: user
            .and_then(|n| n.denied_domains.clone())
            .unwrap_or_default(),
        allow_unix_sockets: user.and_then(|n| n.allow_unix_sockets.clone()),
        allow_all_unix_sockets: user.and_then(|n| n.allow_all_unix_sockets),
        allow_local_binding: user.and_then(|n| n.allow_local_binding).unwrap_or(false),
    }
}
