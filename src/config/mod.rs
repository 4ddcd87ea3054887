//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`CHIT_NAME`, `CHIT_MAIL`,
//!    `CHIT_POLL_INTERVAL_SECS`, `CHIT_HTTP_TIMEOUT_SECS`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./chit.toml in the current directory
//! 4. $XDG_CONFIG_HOME/chit/chit.toml (or ~/.config/chit/chit.toml)
//! 5. Built-in defaults

use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod defaults;
mod env;
mod types;

pub use defaults::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAIL, DEFAULT_POLL_INTERVAL_SECS};
use defaults::{APP_DIR_NAME, CONFIG_FILE_NAME, HISTORY_FILE_NAME};
pub use types::{
    Config, DisplayConfig, HistoryConfig, NetworkConfig, PostConfig, SessionConfig,
};

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let text = read_config_text(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&text)?;
    env::apply_env_overrides(&mut config, &env_lookup)?;
    normalize(&mut config);
    Ok(config)
}

fn read_config_text<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<String, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    if let Some(p) = path_override {
        // An explicit path that cannot be read is an error, not a fallback.
        return Ok(read_file(Path::new(p))?);
    }

    if let Ok(text) = read_file(Path::new(CONFIG_FILE_NAME)) {
        tracing::debug!(path = CONFIG_FILE_NAME, "loaded local config");
        return Ok(text);
    }
    if let Some(dir) = config_root() {
        let global = dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME);
        if let Ok(text) = read_file(&global) {
            tracing::debug!(path = %global.display(), "loaded global config");
            return Ok(text);
        }
    }

    Ok(String::new())
}

/// Clamp values that would otherwise spin or never time out.
fn normalize(config: &mut Config) {
    config.session.poll_interval_secs = config.session.poll_interval_secs.max(1);
    config.network.timeout_secs = config.network.timeout_secs.max(1);
    if let Some(path) = &config.history.path {
        if path.trim().is_empty() {
            config.history.path = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Derived values
// ---------------------------------------------------------------------------

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.session.poll_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout_secs)
    }

    /// Where input history is persisted, or `None` when persistence is off.
    pub fn history_file(&self) -> Option<PathBuf> {
        self.history_file_with(config_root_dir)
    }

    fn history_file_with<FRoot>(&self, config_root: FRoot) -> Option<PathBuf>
    where
        FRoot: Fn() -> Option<PathBuf>,
    {
        if !self.history.persist {
            return None;
        }
        match &self.history.path {
            Some(path) => Some(PathBuf::from(path)),
            None => config_root().map(|dir| dir.join(APP_DIR_NAME).join(HISTORY_FILE_NAME)),
        }
    }
}

/// `$XDG_CONFIG_HOME`, else `~/.config`.
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
