//! # Configuration Loader / 配置加载器
//!
//! Layers defaults, an optional TOML file and `SNIPDESK_*` environment
//! variables into an [`AppConfig`](sd_core::AppConfig).
//! 依次叠加默认值、可选的 TOML 文件和 `SNIPDESK_*` 环境变量。
//!
//! `config set` / `config bootstrap` edit the file in place.

mod editor;
mod loader;
mod paths;

pub use editor::{bootstrap_config_file, set_config_value, CONFIG_KEYS};
pub use loader::{load_app_config, ConfigLoader};
pub use paths::expand_path;
