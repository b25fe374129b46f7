//! Commands that exercise the hook pipeline outside a host.

use std::path::PathBuf;

use anyhow::Context;
use tokio::io::AsyncReadExt;

use super::load_for;
use crate::hooks::{OutputClassifier, Verdict, containment_notice};
use crate::plugin::PluginContext;
use crate::policy::resolve_config;
use crate::sandbox::{SandboxBackend, SrtBackend};

/// Classify output from stdin and print what the operator would see.
pub async fn run_classify_command(ctx: &PluginContext) -> anyhow::Result<()> {
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("failed to read stdin")?;

    let classification = OutputClassifier::default().classify(&text);
    println!("Verdict: {}", classification.verdict);
    println!();
    match classification.verdict {
        Verdict::Blocked => {
            let (env, _, _) = load_for(ctx).await;
            println!("{}", containment_notice(Some(&env.locations(&ctx.directory))));
        }
        Verdict::Noise | Verdict::Clean => println!("{}", classification.cleaned),
    }
    Ok(())
}

/// Initialize an srt backend with the effective policy and print the wrapped
/// command.
pub async fn run_wrap_command(
    ctx: &PluginContext,
    command: &str,
    srt: Option<PathBuf>,
    settings: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (_, config, _) = load_for(ctx).await;
    let policy = resolve_config(&ctx.directory, &ctx.worktree, Some(&config));

    let mut backend = SrtBackend::new();
    if let Some(srt) = srt {
        backend = backend.with_program(srt);
    }
    if let Some(settings) = settings {
        backend = backend.with_settings_path(settings);
    }

    backend
        .initialize(&policy)
        .await
        .context("failed to initialize srt backend")?;
    let wrapped = backend.wrap(command).await?;
    tracing::debug!(settings = %backend.settings_path().display(), "Wrote srt settings");
    println!("{}", wrapped);
    Ok(())
}
