//! # Configuration Resolution / 配置解析
//!
//! Locates the per-user directories, layers the configuration on top and makes
//! sure the snippet directory exists. Nothing here decides behaviour.

use std::path::{Path, PathBuf};

use anyhow::Context;

use sd_core::app_dirs::AppDirs;
use sd_core::ports::AppDirsPort;
use sd_core::AppConfig;
use sd_infra::config::load_app_config;
use sd_platform::DirsAppDirsAdapter;

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub dirs: AppDirs,
    /// The file that was (or would have been) read
    pub config_file: PathBuf,
    pub config: AppConfig,
}

impl ResolvedConfig {
    pub fn log_dir(&self) -> PathBuf {
        self.config
            .log_dir
            .clone()
            .unwrap_or_else(|| self.dirs.logs_dir())
    }
}

/// Resolves directories and configuration for this process.
pub fn resolve_config(override_path: Option<&Path>) -> anyhow::Result<ResolvedConfig> {
    let dirs = DirsAppDirsAdapter::new()
        .get_app_dirs()
        .context("Failed to resolve application directories")?;
    resolve_with_dirs(dirs, override_path)
}

pub fn resolve_with_dirs(
    dirs: AppDirs,
    override_path: Option<&Path>,
) -> anyhow::Result<ResolvedConfig> {
    let config_file = override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dirs.config_file());
    let config = load_app_config(&dirs, override_path)?;
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "Failed to create snippet directory: {}",
            config.data_dir.display()
        )
    })?;
    Ok(ResolvedConfig {
        dirs,
        config_file,
        config,
    })
}
