//! CLI command handling.
//!
//! Provides subcommands for:
//! - Printing the effective policy for a project (`policy`)
//! - Showing where configuration is read from (`paths`)
//! - Previewing how the policy treats a network host (`check-host`)
//! - Classifying captured command output (`classify`)
//! - Wrapping a command for the `srt` runtime (`wrap`)

mod inspect;
mod output;

pub use inspect::{run_check_host_command, run_paths_command, run_policy_command};
pub use output::{run_classify_command, run_wrap_command};

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{ConfigEnv, ConfigSource, RawUserConfig, load_config_with};
use crate::plugin::PluginContext;

#[derive(Parser, Debug)]
#[command(name = "opencode-sandbox")]
#[command(about = "Inspect and exercise the sandbox policy applied to agent shell commands")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Project directory (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub directory: Option<PathBuf>,

    /// Worktree directory (defaults to the project directory)
    #[arg(short, long, global = true)]
    pub worktree: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the effective sandbox policy as JSON
    Policy,

    /// Show the configuration files and which source is in effect
    Paths,

    /// Check whether the policy allows a network host
    CheckHost {
        /// Host name, e.g. api.github.com
        host: String,
    },

    /// Classify command output read from stdin
    Classify,

    /// Print a command wrapped for the srt sandbox runtime
    Wrap {
        /// Command line to wrap
        command: String,

        /// Path to the srt binary (looked up on PATH by default)
        #[arg(long, env = "SRT_PATH")]
        srt: Option<PathBuf>,

        /// Where to write the srt settings file
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

impl Cli {
    /// Host context equivalent to what an agent session would pass.
    pub fn plugin_context(&self) -> anyhow::Result<PluginContext> {
        let directory = match &self.directory {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        let worktree = self.worktree.clone().unwrap_or_else(|| directory.clone());
        Ok(PluginContext::new(directory, worktree))
    }
}

/// Run a CLI command.
pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let ctx = cli.plugin_context()?;
    match cli.command {
        Command::Policy => run_policy_command(&ctx).await,
        Command::Paths => run_paths_command(&ctx).await,
        Command::CheckHost { host } => run_check_host_command(&ctx, &host).await,
        Command::Classify => run_classify_command(&ctx).await,
        Command::Wrap {
            command,
            srt,
            settings,
        } => run_wrap_command(&ctx, &command, srt, settings).await,
    }
}

/// Load configuration for a CLI context from the process environment.
async fn load_for(ctx: &PluginContext) -> (ConfigEnv, RawUserConfig, ConfigSource) {
    let env = ConfigEnv::from_process();
    let (config, source) = load_config_with(&env, &ctx.directory).await;
    (env, config, source)
}
