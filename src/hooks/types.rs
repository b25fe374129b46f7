//! Host-facing hook types and data structures.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool name the host uses for shell commands.
pub const SHELL_TOOL: &str = "bash";

/// Hooks this plugin can register with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookName {
    /// Fires before a tool runs; may rewrite its arguments.
    #[serde(rename = "tool.execute.before")]
    BeforeToolExecute,
    /// Fires after a tool ran; may rewrite its arguments and output.
    #[serde(rename = "tool.execute.after")]
    AfterToolExecute,
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeforeToolExecute => write!(f, "tool.execute.before"),
            Self::AfterToolExecute => write!(f, "tool.execute.after"),
        }
    }
}

/// A single tool invocation as the host describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(rename = "sessionID")]
    pub session_id: String,
    /// Unique per invocation; correlates the before and after hooks.
    #[serde(rename = "callID")]
    pub call_id: String,
    /// Arguments shown to the operator. Only the after hook sees them.
    #[serde(default)]
    pub args: Value,
}

impl ToolCall {
    pub fn new(
        tool: impl Into<String>,
        session_id: impl Into<String>,
        call_id: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            session_id: session_id.into(),
            call_id: call_id.into(),
            args: Value::Null,
        }
    }

    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }

    /// Whether this is a shell invocation.
    pub fn is_shell(&self) -> bool {
        self.tool == SHELL_TOOL
    }
}

/// Mutable arguments handed to the before hook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolArgs {
    #[serde(default)]
    pub args: Value,
}

impl ToolArgs {
    pub fn new(args: Value) -> Self {
        Self { args }
    }

    /// The non-empty `command` argument, if there is one.
    pub fn command(&self) -> Option<&str> {
        command_arg(&self.args)
    }
}

/// Mutable result handed to the after hook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResult {
    #[serde(default)]
    pub title: String,
    /// Raw output of the tool.
    #[serde(default)]
    pub output: Option<String>,
    /// Display data; `metadata.output` is what the UI shows.
    #[serde(default)]
    pub metadata: Value,
}

impl ToolResult {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            output: Some(output.into()),
            metadata: Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// `metadata.output`, when the host supplied it as a string.
    pub fn display_output(&self) -> Option<&str> {
        self.metadata.get("output").and_then(Value::as_str)
    }

    /// Overwrite `metadata.output`. No-op unless it is already a string.
    pub fn set_display_output(&mut self, text: impl Into<String>) -> bool {
        match self.metadata.get_mut("output") {
            Some(slot) if slot.is_string() => {
                *slot = Value::String(text.into());
                true
            }
            _ => false,
        }
    }
}

pub(crate) fn command_arg(args: &Value) -> Option<&str> {
    args.get("command")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
}

/// Overwrite `args.command`. No-op unless it is already a string.
pub(crate) fn set_command_arg(args: &mut Value, command: String) -> bool {
    match args.get_mut("command") {
        Some(slot) if slot.is_string() => {
            *slot = Value::String(command);
            true
        }
        _ => false,
    }
}
