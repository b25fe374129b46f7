//! Layered configuration loading.
//!
//! Sources are tried in order and the first one that yields a usable
//! configuration wins outright; layers are never merged:
//!
//! 1. `OPENCODE_SANDBOX_CONFIG` (JSON in the environment)
//! 2. `<config root>/projects/<project name>.json`
//! 3. `<config root>/config.json`
//! 4. `{}`
//!
//! The config root is `$XDG_CONFIG_HOME/opencode-sandbox`, falling back to
//! `~/.config/opencode-sandbox`.

use std::fmt;
use std::path::{Path, PathBuf};

use super::RawUserConfig;
use crate::error::ConfigError;
use crate::policy::normalize_path;

/// Environment variable carrying a JSON-encoded [`RawUserConfig`].
pub const CONFIG_ENV_VAR: &str = "OPENCODE_SANDBOX_CONFIG";

/// Environment variable that turns sandboxing off when set to `1` or `true`.
pub const DISABLE_ENV_VAR: &str = "OPENCODE_DISABLE_SANDBOX";

const CONFIG_DIR_NAME: &str = "opencode-sandbox";

/// Snapshot of the environment the loader reads.
#[derive(Debug, Clone, Default)]
pub struct ConfigEnv {
    /// Value of `OPENCODE_SANDBOX_CONFIG`.
    pub config_json: Option<String>,
    /// Value of `OPENCODE_DISABLE_SANDBOX`.
    pub disable: Option<String>,
    /// Value of `XDG_CONFIG_HOME`.
    pub xdg_config_home: Option<PathBuf>,
    pub home_dir: Option<PathBuf>,
}

impl ConfigEnv {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self {
            config_json: std::env::var(CONFIG_ENV_VAR).ok(),
            disable: std::env::var(DISABLE_ENV_VAR).ok(),
            xdg_config_home: std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            home_dir: dirs::home_dir(),
        }
    }

    /// Whether the operator forced sandboxing off.
    pub fn sandbox_disabled(&self) -> bool {
        matches!(self.disable.as_deref(), Some("1") | Some("true"))
    }

    /// Directory holding the per-project and global config files.
    pub fn config_root(&self) -> PathBuf {
        let base = match &self.xdg_config_home {
            Some(xdg) if !xdg.as_os_str().is_empty() => xdg.clone(),
            _ => self
                .home_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config"),
        };
        base.join(CONFIG_DIR_NAME)
    }

    /// Config file locations for a project.
    pub fn locations(&self, project_dir: &Path) -> ConfigLocations {
        let root = self.config_root();
        let project_file = normalize_path(project_dir)
            .file_name()
            .map(|name| {
                let mut file = name.to_os_string();
                file.push(".json");
                root.join("projects").join(file)
            });
        ConfigLocations {
            global_file: root.join("config.json"),
            project_file,
            root,
        }
    }
}

/// Where configuration files live for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocations {
    pub root: PathBuf,
    /// `None` when the project directory has no base name (e.g. `/`).
    pub project_file: Option<PathBuf>,
    pub global_file: PathBuf,
}

/// Which source produced the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Env,
    ProjectFile(PathBuf),
    GlobalFile(PathBuf),
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env => write!(f, "{CONFIG_ENV_VAR}"),
            Self::ProjectFile(path) | Self::GlobalFile(path) => write!(f, "{}", path.display()),
            Self::Default => write!(f, "built-in defaults"),
        }
    }
}

/// Load the configuration for `project_dir` from the process environment.
pub async fn load_config(project_dir: impl AsRef<Path>) -> RawUserConfig {
    load_config_with(&ConfigEnv::from_process(), project_dir.as_ref())
        .await
        .0
}

/// Load the configuration against an explicit environment snapshot and report
/// which source won.
pub async fn load_config_with(
    env: &ConfigEnv,
    project_dir: &Path,
) -> (RawUserConfig, ConfigSource) {
    let locations = env.locations(project_dir);

    let mut sources = vec![ConfigSource::Env];
    if let Some(project_file) = locations.project_file {
        sources.push(ConfigSource::ProjectFile(project_file));
    }
    sources.push(ConfigSource::GlobalFile(locations.global_file));

    for source in sources {
        if let Some(config) = try_source(env, &source).await {
            tracing::debug!(source = %source, "Loaded sandbox configuration");
            return (config, source);
        }
    }

    (RawUserConfig::default(), ConfigSource::Default)
}

async fn try_source(env: &ConfigEnv, source: &ConfigSource) -> Option<RawUserConfig> {
    match source {
        ConfigSource::Env => {
            let json = env.config_json.as_deref().filter(|s| !s.is_empty())?;
            match parse_config(CONFIG_ENV_VAR, json) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring {}, falling back", CONFIG_ENV_VAR);
                    None
                }
            }
        }
        ConfigSource::ProjectFile(path) | ConfigSource::GlobalFile(path) => {
            match read_config_file(path).await {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
                    None
                }
            }
        }
        ConfigSource::Default => Some(RawUserConfig::default()),
    }
}

/// `Ok(None)` when the file does not exist.
async fn read_config_file(path: &Path) -> Result<Option<RawUserConfig>, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Config file not found");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    parse_config(&path.display().to_string(), &content).map(Some)
}

fn parse_config(source_name: &str, text: &str) -> Result<RawUserConfig, ConfigError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ConfigError::InvalidJson {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;
    if !value.is_object() {
        return Err(ConfigError::NotAnObject {
            source_name: source_name.to_string(),
        });
    }
    serde_json::from_value(value).map_err(|e| ConfigError::InvalidJson {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::config::RawFilesystemConfig;

    fn env_in(xdg: &TempDir) -> ConfigEnv {
        ConfigEnv {
            xdg_config_home: Some(xdg.path().to_path_buf()),
            home_dir: Some(PathBuf::from("/home/tester")),
            ..ConfigEnv::default()
        }
    }

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn deny_read(config: &RawUserConfig) -> Vec<PathBuf> {
        config
            .filesystem
            .as_ref()
            .and_then(|fs| fs.deny_read.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_uses_xdg_config_home_when_set() {
        let env = ConfigEnv {
            xdg_config_home: Some(PathBuf::from("/custom/config")),
            home_dir: Some(PathBuf::from("/home/tester")),
            ..ConfigEnv::default()
        };
        assert_eq!(env.config_root(), PathBuf::from("/custom/config/opencode-sandbox"));
    }

    #[test]
    fn test_falls_back_to_home_config() {
        let env = ConfigEnv {
            xdg_config_home: Some(PathBuf::new()),
            home_dir: Some(PathBuf::from("/home/tester")),
            ..ConfigEnv::default()
        };
        assert_eq!(
            env.config_root(),
            PathBuf::from("/home/tester/.config/opencode-sandbox")
        );
    }

    #[test]
    fn test_locations_use_project_base_name() {
        let env = ConfigEnv {
            xdg_config_home: Some(PathBuf::from("/cfg")),
            ..ConfigEnv::default()
        };
        let locations = env.locations(Path::new("/work/my-app/"));
        assert_eq!(
            locations.project_file,
            Some(PathBuf::from("/cfg/opencode-sandbox/projects/my-app.json"))
        );
        assert_eq!(
            locations.global_file,
            PathBuf::from("/cfg/opencode-sandbox/config.json")
        );
        assert_eq!(env.locations(Path::new("/")).project_file, None);
    }

    #[test]
    fn test_sandbox_disabled_values() {
        let with = |v: &str| ConfigEnv {
            disable: Some(v.to_string()),
            ..ConfigEnv::default()
        };
        assert!(with("1").sandbox_disabled());
        assert!(with("true").sandbox_disabled());
        assert!(!with("0").sandbox_disabled());
        assert!(!with("yes").sandbox_disabled());
        assert!(!ConfigEnv::default().sandbox_disabled());
    }

    #[tokio::test]
    async fn test_returns_empty_config_when_nothing_present() {
        let xdg = TempDir::new().unwrap();
        let (config, source) = load_config_with(&env_in(&xdg), Path::new("/work/app")).await;
        assert_eq!(config, RawUserConfig::default());
        assert_eq!(source, ConfigSource::Default);
    }

    #[tokio::test]
    async fn test_loads_from_env_var() {
        let xdg = TempDir::new().unwrap();
        let env = ConfigEnv {
            config_json: Some(r#"{"filesystem": {"denyRead": ["/from/env"]}}"#.to_string()),
            ..env_in(&xdg)
        };
        let (config, source) = load_config_with(&env, Path::new("/work/app")).await;
        assert_eq!(source, ConfigSource::Env);
        assert_eq!(deny_read(&config), vec![PathBuf::from("/from/env")]);
    }

    #[tokio::test]
    async fn test_loads_per_project_config() {
        let xdg = TempDir::new().unwrap();
        let project_file = xdg.path().join("opencode-sandbox/projects/app.json");
        write(&project_file, r#"{"network": {"allowedDomains": ["project.dev"]}}"#);

        let (config, source) = load_config_with(&env_in(&xdg), Path::new("/work/app")).await;
        assert_eq!(source, ConfigSource::ProjectFile(project_file));
        assert_eq!(
            config.network.unwrap().allowed_domains,
            Some(vec!["project.dev".to_string()])
        );
    }

    #[tokio::test]
    async fn test_loads_global_config() {
        let xdg = TempDir::new().unwrap();
        let global_file = xdg.path().join("opencode-sandbox/config.json");
        write(&global_file, r#"{"filesystem": {"denyRead": ["/global"]}}"#);

        let (config, source) = load_config_with(&env_in(&xdg), Path::new("/work/app")).await;
        assert_eq!(source, ConfigSource::GlobalFile(global_file));
        assert_eq!(deny_read(&config), vec![PathBuf::from("/global")]);
    }

    #[tokio::test]
    async fn test_env_var_takes_priority_over_files() {
        let xdg = TempDir::new().unwrap();
        write(
            &xdg.path().join("opencode-sandbox/projects/app.json"),
            r#"{"filesystem": {"denyRead": ["/project"]}}"#,
        );
        write(
            &xdg.path().join("opencode-sandbox/config.json"),
            r#"{"filesystem": {"denyRead": ["/global"]}}"#,
        );
        let env = ConfigEnv {
            config_json: Some(r#"{"filesystem": {"denyRead": ["/env"]}}"#.to_string()),
            ..env_in(&xdg)
        };

        let (config, _) = load_config_with(&env, Path::new("/work/app")).await;
        assert_eq!(deny_read(&config), vec![PathBuf::from("/env")]);
    }

    #[tokio::test]
    async fn test_project_config_takes_priority_over_global() {
        let xdg = TempDir::new().unwrap();
        write(
            &xdg.path().join("opencode-sandbox/projects/app.json"),
            r#"{"filesystem": {"denyRead": ["/project"]}}"#,
        );
        write(
            &xdg.path().join("opencode-sandbox/config.json"),
            r#"{"filesystem": {"denyRead": ["/global"]}}"#,
        );

        let (config, _) = load_config_with(&env_in(&xdg), Path::new("/work/app")).await;
        assert_eq!(deny_read(&config), vec![PathBuf::from("/project")]);
    }

    #[tokio::test]
    async fn test_invalid_env_json_falls_through_to_files() {
        let xdg = TempDir::new().unwrap();
        write(
            &xdg.path().join("opencode-sandbox/config.json"),
            r#"{"disabled": true}"#,
        );
        let env = ConfigEnv {
            config_json: Some("{not json".to_string()),
            ..env_in(&xdg)
        };

        let (config, source) = load_config_with(&env, Path::new("/work/app")).await;
        assert!(config.is_disabled());
        assert!(matches!(source, ConfigSource::GlobalFile(_)));
    }

    #[tokio::test]
    async fn test_invalid_file_json_is_skipped() {
        let xdg = TempDir::new().unwrap();
        write(
            &xdg.path().join("opencode-sandbox/projects/app.json"),
            "not valid json",
        );

        let (config, source) = load_config_with(&env_in(&xdg), Path::new("/work/app")).await;
        assert_eq!(config, RawUserConfig::default());
        assert_eq!(source, ConfigSource::Default);
    }

    #[tokio::test]
    async fn test_non_object_json_is_skipped() {
        let xdg = TempDir::new().unwrap();
        let env = ConfigEnv {
            config_json: Some("null".to_string()),
            ..env_in(&xdg)
        };
        let (_, source) = load_config_with(&env, Path::new("/work/app")).await;
        assert_eq!(source, ConfigSource::Default);
    }

    #[tokio::test]
    async fn test_mistyped_field_is_skipped() {
        let xdg = TempDir::new().unwrap();
        write(
            &xdg.path().join("opencode-sandbox/projects/app.json"),
            r#"{"filesystem": {"allowWrite": "/not/a/list"}}"#,
        );
        write(
            &xdg.path().join("opencode-sandbox/config.json"),
            r#"{"filesystem": {"allowWrite": ["/global"]}}"#,
        );

        let (config, _) = load_config_with(&env_in(&xdg), Path::new("/work/app")).await;
        assert_eq!(
            config.filesystem,
            Some(RawFilesystemConfig {
                allow_write: Some(vec![PathBuf::from("/global")]),
                ..RawFilesystemConfig::default()
            })
        );
    }

    #[test]
    fn test_empty_env_value_counts_as_absent() {
        let xdg = TempDir::new().unwrap();
        let env = ConfigEnv {
            config_json: Some(String::new()),
            ..env_in(&xdg)
        };
        let (_, source) = tokio_test::block_on(load_config_with(&env, Path::new("/work/app")));
        assert_eq!(source, ConfigSource::Default);
    }
}
