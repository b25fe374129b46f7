//! Command interception lifecycle.
//!
//! For every shell invocation the before hook swaps the command for its
//! sandboxed form and remembers the original under the call id; the after
//! hook puts the original back for display and classifies the output.
//!
//! Wrapping is fail-open: if the backend cannot wrap a command, the command
//! runs unsandboxed and a warning is logged. Tests pin this behavior.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::classify::{OutputClassifier, Verdict};
use super::types::{HookName, ToolArgs, ToolCall, ToolResult, set_command_arg};
use crate::config::{CONFIG_ENV_VAR, ConfigLocations};
use crate::sandbox::SandboxBackend;

/// Notice shown in place of output the sandbox blocked.
pub fn containment_notice(locations: Option<&ConfigLocations>) -> String {
    let file = locations
        .and_then(|l| l.project_file.as_ref())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/opencode-sandbox/config.json".to_string());
    format!(
        "⚠️ [opencode-sandbox] Command blocked or partially blocked by sandbox restrictions. \
         Adjust config in {file} or {CONFIG_ENV_VAR}."
    )
}

/// Per-activation state and logic for the two tool hooks.
pub struct CommandLifecycle {
    backend: Arc<dyn SandboxBackend>,
    classifier: OutputClassifier,
    notice: String,
    /// Original command text by call id.
    pending: Mutex<HashMap<String, String>>,
}

impl CommandLifecycle {
    pub fn new(backend: Arc<dyn SandboxBackend>) -> Self {
        Self {
            backend,
            classifier: OutputClassifier::default(),
            notice: containment_notice(None),
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_classifier(mut self, classifier: OutputClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = notice.into();
        self
    }

    pub fn notice(&self) -> &str {
        &self.notice
    }

    /// Invocations whose after hook has not fired yet.
    pub async fn pending(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Wrap a shell command in the sandbox. Never fails.
    pub async fn before_execute(&self, call: &ToolCall, output: &mut ToolArgs) {
        if !call.is_shell() {
            return;
        }
        let Some(original) = output.command().map(str::to_string) else {
            return;
        };

        self.pending
            .lock()
            .await
            .insert(call.call_id.clone(), original.clone());

        match self.backend.wrap(&original).await {
            Ok(wrapped) => {
                set_command_arg(&mut output.args, wrapped);
            }
            Err(e) => {
                tracing::warn!(
                    call_id = %call.call_id,
                    error = %e,
                    "Failed to wrap command, running unsandboxed"
                );
            }
        }
    }

    /// Restore the original command and clean up the output. Never fails.
    ///
    /// Returns the verdict for shell invocations, `None` for other tools.
    pub async fn after_execute(
        &self,
        call: &mut ToolCall,
        result: &mut ToolResult,
    ) -> Option<Verdict> {
        if !call.is_shell() {
            return None;
        }

        let original = self.pending.lock().await.remove(&call.call_id);
        match original {
            Some(original) => {
                if !set_command_arg(&mut call.args, original) {
                    tracing::debug!(call_id = %call.call_id, "No command argument to restore");
                }
            }
            None => {
                tracing::debug!(call_id = %call.call_id, "No recorded command for call");
            }
        }

        let text = result.output.as_deref().unwrap_or("");
        let classification = self.classifier.classify(text);

        match classification.verdict {
            Verdict::Blocked => {
                tracing::info!(call_id = %call.call_id, "Command blocked by sandbox");
                result.output = Some(format!("{}\n\n{}", classification.cleaned, self.notice));
                result.set_display_output(self.notice.clone());
            }
            Verdict::Noise => {
                result.set_display_output(classification.cleaned.clone());
                result.output = Some(classification.cleaned);
            }
            Verdict::Clean => {}
        }

        Some(classification.verdict)
    }
}

/// The hooks an activation hands to the host.
///
/// Empty when sandboxing is off for the session; both entry points are then
/// no-ops.
#[derive(Clone, Default)]
pub struct Hooks {
    lifecycle: Option<Arc<CommandLifecycle>>,
}

impl Hooks {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(lifecycle: CommandLifecycle) -> Self {
        Self {
            lifecycle: Some(Arc::new(lifecycle)),
        }
    }

    /// Names of the registered hooks.
    pub fn registered(&self) -> Vec<HookName> {
        if self.lifecycle.is_some() {
            vec![HookName::BeforeToolExecute, HookName::AfterToolExecute]
        } else {
            Vec::new()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lifecycle.is_none()
    }

    pub fn lifecycle(&self) -> Option<&CommandLifecycle> {
        self.lifecycle.as_deref()
    }

    /// `tool.execute.before`
    pub async fn tool_execute_before(&self, call: &ToolCall, output: &mut ToolArgs) {
        if let Some(lifecycle) = &self.lifecycle {
            lifecycle.before_execute(call, output).await;
        }
    }

    /// `tool.execute.after`
    pub async fn tool_execute_after(&self, call: &mut ToolCall, result: &mut ToolResult) {
        if let Some(lifecycle) = &self.lifecycle {
            lifecycle.after_execute(call, result).await;
        }
    }
}
