use std::path::PathBuf;

use sd_core::{
    app_dirs::AppDirs,
    ports::{AppDirsError, AppDirsPort},
};

const APP_DIR_NAME: &str = "snipdesk";
const PROFILE_ENV: &str = "SNIPDESK_PROFILE";

/// `snipdesk`, or `snipdesk-<profile>` when `SNIPDESK_PROFILE` is set.
fn resolved_app_dir_name(profile: Option<String>) -> String {
    match profile {
        Some(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

pub struct DirsAppDirsAdapter {
    base_override: Option<PathBuf>,
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self {
            base_override: None,
        }
    }

    /// Resolves both roots under `base` instead of the system directories.
    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            base_override: Some(base),
        }
    }

    fn base_data_local_dir(&self) -> Option<PathBuf> {
        match &self.base_override {
            Some(base) => Some(base.clone()),
            None => dirs::data_local_dir(),
        }
    }

    fn base_config_dir(&self) -> Option<PathBuf> {
        match &self.base_override {
            Some(base) => Some(base.join("config")),
            None => dirs::config_dir(),
        }
    }

    fn resolve(&self, profile: Option<String>) -> Result<AppDirs, AppDirsError> {
        let base_data = self
            .base_data_local_dir()
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;
        let base_config = self
            .base_config_dir()
            .ok_or(AppDirsError::ConfigDirUnavailable)?;
        let app_dir_name = resolved_app_dir_name(profile);

        Ok(AppDirs {
            app_data_root: base_data.join(&app_dir_name),
            app_config_root: base_config.join(&app_dir_name),
        })
    }
}

impl Default for DirsAppDirsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl AppDirsPort for DirsAppDirsAdapter {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        self.resolve(std::env::var(PROFILE_ENV).ok())
    }
}
