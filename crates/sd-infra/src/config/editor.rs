//! Writes the TOML config file. Reading always goes through [`ConfigLoader`](super::ConfigLoader).

use std::path::Path;

use anyhow::{bail, Context};
use toml::{Table, Value};
use tracing::info;

use sd_core::{AppConfig, ImmediateFailurePolicy};

/// Keys accepted by [`set_config_value`].
pub const CONFIG_KEYS: &[&str] = &["data_dir", "immediate_failure", "log_dir"];

/// Sets one key in the config file, keeping every other entry.
///
/// The file is created if it does not exist yet.
pub fn set_config_value(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    if !CONFIG_KEYS.contains(&key) {
        bail!(
            "unknown configuration key: {key} (available: {})",
            CONFIG_KEYS.join(", ")
        );
    }
    if key == "immediate_failure" {
        Value::String(value.to_string())
            .try_into::<ImmediateFailurePolicy>()
            .with_context(|| format!("invalid immediate_failure policy '{value}'"))?;
    }

    let mut table = read_table(path)?;
    table.insert(key.to_string(), Value::String(value.to_string()));
    write_table(path, &table)?;
    info!(path = %path.display(), key, "configuration value set");
    Ok(())
}

/// Writes `defaults` as a fresh config file. Refuses to touch an existing one.
pub fn bootstrap_config_file(path: &Path, defaults: &AppConfig) -> anyhow::Result<()> {
    if path.exists() {
        bail!(
            "config file already exists: {}; delete it and re-run",
            path.display()
        );
    }

    let mut table = Table::new();
    table.insert(
        "data_dir".to_string(),
        Value::String(defaults.data_dir.display().to_string()),
    );
    table.insert(
        "immediate_failure".to_string(),
        Value::String(defaults.immediate_failure.as_str().to_string()),
    );
    if let Some(log_dir) = &defaults.log_dir {
        table.insert(
            "log_dir".to_string(),
            Value::String(log_dir.display().to_string()),
        );
    }
    write_table(path, &table)?;
    info!(path = %path.display(), "configuration bootstrapped");
    Ok(())
}

fn read_table(path: &Path) -> anyhow::Result<Table> {
    match std::fs::read_to_string(path) {
        Ok(text) => text
            .parse::<Table>()
            .with_context(|| format!("Failed to parse config file {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Table::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read config file {}", path.display())),
    }
}

fn write_table(path: &Path, table: &Table) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    let text = toml::to_string_pretty(table).context("Failed to serialize configuration")?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, text)
        .with_context(|| format!("Failed to write config file {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace config file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    use sd_core::app_dirs::AppDirs;

    use crate::config::ConfigLoader;

    fn loader(root: &Path, file: &Path) -> ConfigLoader {
        ConfigLoader::new(AppDirs {
            app_data_root: root.join("data"),
            app_config_root: root.join("config"),
        })
        .with_file(file)
        .with_env(HashMap::new())
    }

    #[test]
    fn set_keeps_other_keys_and_is_read_back() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("nested").join("config.toml");

        set_config_value(&file, "data_dir", "/srv/snips").unwrap();
        set_config_value(&file, "immediate_failure", "keep").unwrap();

        let config = loader(tmp.path(), &file).load().unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/snips"));
        assert_eq!(config.immediate_failure, ImmediateFailurePolicy::Keep);
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_policies() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("config.toml");

        let err = set_config_value(&file, "data_directory", "/x").unwrap_err();
        assert!(err.to_string().contains("unknown configuration key"));
        assert!(set_config_value(&file, "immediate_failure", "sometimes").is_err());
        assert!(!file.exists());
    }

    #[test]
    fn bootstrap_writes_defaults_once() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("config.toml");
        let defaults = AppConfig {
            data_dir: tmp.path().join("snippets"),
            immediate_failure: ImmediateFailurePolicy::Rollback,
            log_dir: None,
        };

        bootstrap_config_file(&file, &defaults).unwrap();
        assert_eq!(loader(tmp.path(), &file).load().unwrap(), defaults);

        let err = bootstrap_config_file(&file, &defaults).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
