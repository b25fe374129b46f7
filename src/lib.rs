//! Sandboxing for agent shell commands.
//!
//! The crate sits between an AI coding-agent host and its `bash` tool:
//!
//! - [`config`] loads the operator's overrides (env var, per-project file,
//!   global file, first one wins)
//! - [`policy`] merges them with safe defaults into an [`EffectivePolicy`]
//! - [`plugin`] initializes the sandbox backend with that policy and hands the
//!   host a pair of lifecycle [`hooks`]
//! - [`hooks`] wraps each command before it runs, restores the original text
//!   afterwards and explains sandbox denials in the output
//!
//! Enforcement itself is delegated to a [`SandboxBackend`].

pub mod cli;
pub mod config;
pub mod error;
pub mod hooks;
pub mod plugin;
pub mod policy;
pub mod sandbox;

pub use config::{ConfigEnv, ConfigLocations, RawUserConfig, load_config};
pub use error::{Error, Result};
pub use hooks::{
    CommandLifecycle, HookName, Hooks, OutputClassifier, ToolArgs, ToolCall, ToolResult, Verdict,
};
pub use plugin::{PluginContext, activate, activate_with_env};
pub use policy::{EffectivePolicy, is_safe_write_path, resolve_config};
pub use sandbox::{SandboxBackend, SandboxError, SrtBackend};
