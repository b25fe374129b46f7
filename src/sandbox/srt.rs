//! Backend for Anthropic's `srt` sandbox-runtime CLI.
//!
//! `initialize` writes the policy to a settings file and locates the `srt`
//! binary; `wrap` produces `srt --settings <file> '<command>'`, quoted for a
//! POSIX shell. All enforcement happens inside `srt`.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use async_trait::async_trait;

use super::{Result, SandboxBackend, SandboxError};
use crate::policy::EffectivePolicy;

/// Overrides the `srt` lookup on `PATH`.
pub const SRT_PATH_ENV: &str = "SRT_PATH";

/// Drives the external `srt` binary.
#[derive(Debug)]
pub struct SrtBackend {
    /// Explicit binary path; `None` means look it up at initialization.
    program: Option<PathBuf>,
    settings_path: PathBuf,
    /// Binary resolved by a successful `initialize`.
    resolved: OnceLock<PathBuf>,
}

impl SrtBackend {
    /// Settings go to `<temp>/opencode-sandbox/srt-settings.json`.
    pub fn new() -> Self {
        Self {
            program: std::env::var_os(SRT_PATH_ENV).map(PathBuf::from),
            settings_path: std::env::temp_dir()
                .join("opencode-sandbox")
                .join("srt-settings.json"),
            resolved: OnceLock::new(),
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = Some(program.into());
        self
    }

    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = path.into();
        self
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    fn locate_program(&self) -> Result<PathBuf> {
        match &self.program {
            Some(path) if path.is_file() => Ok(path.clone()),
            Some(path) => Err(SandboxError::InitializationFailed {
                reason: format!("srt binary not found at {}", path.display()),
            }),
            None => which::which("srt").map_err(|e| SandboxError::InitializationFailed {
                reason: format!(
                    "'srt' was not found in PATH ({e}). Install via `npm install -g @anthropic-ai/sandbox-runtime` or set {SRT_PATH_ENV}"
                ),
            }),
        }
    }
}

impl Default for SrtBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SandboxBackend for SrtBackend {
    async fn initialize(&self, policy: &EffectivePolicy) -> Result<()> {
        let program = self.locate_program()?;

        let settings = serde_json::to_vec_pretty(policy)?;
        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.settings_path, settings).await?;

        tracing::debug!(
            program = %program.display(),
            settings = %self.settings_path.display(),
            "srt backend initialized"
        );
        // A second initialize keeps the first binary; the settings file is
        // rewritten either way.
        let _ = self.resolved.set(program);
        Ok(())
    }

    async fn wrap(&self, command: &str) -> Result<String> {
        let program = self.resolved.get().ok_or(SandboxError::NotInitialized)?;

        if command.contains('\0') {
            return Err(SandboxError::WrapFailed {
                reason: "command contains a NUL byte".to_string(),
            });
        }
        let program = utf8(program)?;
        let settings = utf8(&self.settings_path)?;

        Ok(shell_words::join([program, "--settings", settings, command]))
    }
}

fn utf8(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| SandboxError::WrapFailed {
        reason: format!("path is not valid UTF-8: {}", path.display()),
    })
}
