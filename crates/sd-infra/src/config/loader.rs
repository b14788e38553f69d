use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use sd_core::app_dirs::AppDirs;
use sd_core::{AppConfig, ImmediateFailurePolicy};

use super::paths::expand_path;

const ENV_PREFIX: &str = "SNIPDESK";

/// Layered values before defaults are applied. Absent keys stay `None`.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    data_dir: Option<String>,
    immediate_failure: Option<ImmediateFailurePolicy>,
    log_dir: Option<String>,
}

/// Resolves [`AppConfig`] from defaults, a TOML file and the environment.
///
/// The environment can be replaced with a fixed map so tests never depend on
/// the process environment.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    dirs: AppDirs,
    file: PathBuf,
    env: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    pub fn new(dirs: AppDirs) -> Self {
        Self {
            file: dirs.config_file(),
            dirs,
            env: None,
        }
    }

    /// Reads this file instead of `<config dir>/config.toml`.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = path.into();
        self
    }

    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn load(&self) -> anyhow::Result<AppConfig> {
        let raw: RawConfig = Config::builder()
            .add_source(
                File::from(self.file.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .source(self.env.clone()),
            )
            .build()
            .with_context(|| format!("Failed to read config from {}", self.file.display()))?
            .try_deserialize()
            .context("Failed to parse configuration values")?;

        debug!(file = %self.file.display(), ?raw, "configuration layers merged");

        let lookup = |name: &str| self.lookup(name);
        Ok(AppConfig {
            data_dir: raw
                .data_dir
                .filter(|s| !s.trim().is_empty())
                .map(|s| expand_path(&s, lookup))
                .unwrap_or_else(|| self.dirs.snippets_dir()),
            immediate_failure: raw.immediate_failure.unwrap_or_default(),
            log_dir: raw
                .log_dir
                .filter(|s| !s.trim().is_empty())
                .map(|s| expand_path(&s, lookup)),
        })
    }

    fn lookup(&self, name: &str) -> Option<String> {
        match &self.env {
            Some(env) => env.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }
}

/// Loads configuration from the process environment and the default (or
/// overridden) config file.
pub fn load_app_config(dirs: &AppDirs, override_path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let loader = ConfigLoader::new(dirs.clone());
    match override_path {
        Some(path) => loader.with_file(path).load(),
        None => loader.load(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirs(root: &Path) -> AppDirs {
        AppDirs {
            app_data_root: root.join("data"),
            app_config_root: root.join("config"),
        }
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ConfigLoader::new(dirs(tmp.path()))
            .with_env(env(&[]))
            .load()
            .unwrap();

        assert_eq!(config.data_dir, tmp.path().join("data").join("snippets"));
        assert_eq!(config.immediate_failure, ImmediateFailurePolicy::Rollback);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn file_values_are_read_and_expanded() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = dirs(tmp.path());
        std::fs::create_dir_all(&dirs.app_config_root).unwrap();
        std::fs::write(
            dirs.config_file(),
            "data_dir = \"~/notes/snips\"\nimmediate_failure = \"keep\"\nlog_dir = \"$LOGS/sd\"\n",
        )
        .unwrap();

        let config = ConfigLoader::new(dirs)
            .with_env(env(&[("HOME", "/home/ada"), ("LOGS", "/var/log")]))
            .load()
            .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/home/ada/notes/snips"));
        assert_eq!(config.immediate_failure, ImmediateFailurePolicy::Keep);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/sd")));
    }

    #[test]
    fn environment_overrides_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("custom.toml");
        std::fs::write(&file, "data_dir = \"/from/file\"\nimmediate_failure = \"keep\"\n").unwrap();

        let config = ConfigLoader::new(dirs(tmp.path()))
            .with_file(&file)
            .with_env(env(&[
                ("SNIPDESK_DATA_DIR", "/from/env"),
                ("SNIPDESK_IMMEDIATE_FAILURE", "rollback"),
            ]))
            .load()
            .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/from/env"));
        assert_eq!(config.immediate_failure, ImmediateFailurePolicy::Rollback);
    }

    #[test]
    fn unknown_policy_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = ConfigLoader::new(dirs(tmp.path()))
            .with_env(env(&[("SNIPDESK_IMMEDIATE_FAILURE", "sometimes")]))
            .load();
        assert!(result.is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("bad.toml");
        std::fs::write(&file, "data_dir = [").unwrap();

        let result = ConfigLoader::new(dirs(tmp.path()))
            .with_file(&file)
            .with_env(env(&[]))
            .load();
        assert!(result.is_err());
    }
}
