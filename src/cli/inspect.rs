//! Policy inspection commands.

use super::load_for;
use crate::config::{CONFIG_ENV_VAR, DISABLE_ENV_VAR};
use crate::plugin::PluginContext;
use crate::policy::{EffectivePolicy, resolve_config};

async fn effective_policy(ctx: &PluginContext) -> EffectivePolicy {
    let (_, config, _) = load_for(ctx).await;
    resolve_config(&ctx.directory, &ctx.worktree, Some(&config))
}

/// Print the effective policy as pretty JSON.
pub async fn run_policy_command(ctx: &PluginContext) -> anyhow::Result<()> {
    let policy = effective_policy(ctx).await;
    println!("{}", serde_json::to_string_pretty(&policy)?);
    Ok(())
}

/// Print configuration locations and the source in effect.
pub async fn run_paths_command(ctx: &PluginContext) -> anyhow::Result<()> {
    let (env, config, source) = load_for(ctx).await;
    let locations = env.locations(&ctx.directory);

    println!("Config root:    {}", locations.root.display());
    match &locations.project_file {
        Some(path) => println!("Project config: {}", path.display()),
        None => println!("Project config: (none, project directory has no name)"),
    }
    println!("Global config:  {}", locations.global_file.display());
    println!(
        "Env override:   {}",
        if env.config_json.as_deref().is_some_and(|s| !s.is_empty()) {
            "set"
        } else {
            "not set"
        }
    );
    println!();
    println!("In effect: {}", source);
    if env.sandbox_disabled() {
        println!("Sandbox is disabled by {}", DISABLE_ENV_VAR);
    } else if config.is_disabled() {
        println!("Sandbox is disabled by configuration");
    }
    println!();
    println!("To override for one run: {}='{{\"network\": {{...}}}}'", CONFIG_ENV_VAR);
    Ok(())
}

/// Print how the policy treats `host`.
pub async fn run_check_host_command(ctx: &PluginContext, host: &str) -> anyhow::Result<()> {
    let policy = effective_policy(ctx).await;
    println!("{}: {}", host, policy.network.decide(host));
    Ok(())
}
