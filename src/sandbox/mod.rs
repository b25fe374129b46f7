//! Sandbox enforcement backends.
//!
//! This crate decides *what* a sandboxed command may touch; a
//! [`SandboxBackend`] decides *how*. The backend receives the resolved
//! [`EffectivePolicy`] once per activation and then turns plain command
//! strings into commands that run under that policy.
//!
//! [`SrtBackend`] drives the external `srt` sandbox-runtime CLI.

mod error;
mod srt;

use async_trait::async_trait;

use crate::policy::EffectivePolicy;

pub use error::{Result, SandboxError};
pub use srt::SrtBackend;

/// An external sandbox enforcement engine.
#[async_trait]
pub trait SandboxBackend: Send + Sync {
    /// Prepare the backend to enforce `policy`. Called once per activation.
    async fn initialize(&self, policy: &EffectivePolicy) -> Result<()>;

    /// Rewrite `command` so that it runs inside the sandbox.
    async fn wrap(&self, command: &str) -> Result<String>;
}
