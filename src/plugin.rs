//! Plugin activation.
//!
//! Called once per host session. Loads the operator's configuration,
//! resolves the effective policy, initializes the sandbox backend and returns
//! the [`Hooks`] to register. Every way this can go wrong ends in empty hooks
//! and a log line; activation itself never fails.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{ConfigEnv, DISABLE_ENV_VAR, load_config_with};
use crate::hooks::{CommandLifecycle, Hooks, containment_notice};
use crate::policy::{ResolveContext, resolve_config_in};
use crate::sandbox::SandboxBackend;

/// What the host tells the plugin on activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginContext {
    /// Project directory of the session.
    pub directory: PathBuf,
    /// Git worktree root; often the same as `directory`.
    pub worktree: PathBuf,
}

impl PluginContext {
    pub fn new(directory: impl Into<PathBuf>, worktree: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            worktree: worktree.into(),
        }
    }
}

/// Activate against the process environment.
pub async fn activate(ctx: &PluginContext, backend: Arc<dyn SandboxBackend>) -> Hooks {
    activate_with_env(ctx, backend, &ConfigEnv::from_process()).await
}

/// Activate against an explicit environment snapshot.
pub async fn activate_with_env(
    ctx: &PluginContext,
    backend: Arc<dyn SandboxBackend>,
    env: &ConfigEnv,
) -> Hooks {
    if cfg!(windows) {
        tracing::warn!("Not supported on Windows, sandbox disabled");
        return Hooks::empty();
    }

    if env.sandbox_disabled() {
        tracing::info!("Sandbox disabled by {}", DISABLE_ENV_VAR);
        return Hooks::empty();
    }

    let (user_config, source) = load_config_with(env, &ctx.directory).await;
    if user_config.is_disabled() {
        tracing::info!(source = %source, "Sandbox disabled by configuration");
        return Hooks::empty();
    }

    let resolve_ctx = ResolveContext {
        home_dir: env
            .home_dir
            .clone()
            .unwrap_or_else(|| ResolveContext::from_process().home_dir),
        temp_dir: std::env::temp_dir(),
    };
    let policy = resolve_config_in(&resolve_ctx, &ctx.directory, &ctx.worktree, Some(&user_config));

    if let Err(e) = backend.initialize(&policy).await {
        tracing::error!(error = %e, "Failed to initialize sandbox");
        tracing::warn!("Commands will run without sandbox");
        return Hooks::empty();
    }

    let allow_write = policy
        .filesystem
        .allow_write
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    tracing::info!(source = %source, "Sandbox initialized, writes allowed in: {}", allow_write);

    let notice = containment_notice(Some(&env.locations(&ctx.directory)));
    Hooks::new(CommandLifecycle::new(backend).with_notice(notice))
}
