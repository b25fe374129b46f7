//! Tool lifecycle hooks.
//!
//! Two hooks are registered with the host, both only acting on `bash`:
//! - `tool.execute.before`: wrap the command in the sandbox
//! - `tool.execute.after`: restore the original command text and explain
//!   sandbox denials in the output

mod classify;
mod lifecycle;
mod types;

pub use classify::{
    BENIGN_PATTERNS, BLOCK_INDICATORS, Classification, ClassifierError, OutputClassifier, Verdict,
};
pub use lifecycle::{CommandLifecycle, Hooks, containment_notice};
pub use types::{HookName, SHELL_TOOL, ToolArgs, ToolCall, ToolResult};

#[cfg(test)]
pub(crate) use lifecycle::tests::MockBackend;
