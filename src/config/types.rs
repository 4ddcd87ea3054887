//! Configuration data model.
//!
//! Every section deserializes with `#[serde(default)]`, so a partial file
//! only overrides what it names.

use serde::Deserialize;

use super::defaults::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAIL, DEFAULT_POLL_INTERVAL_SECS};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub post: PostConfig,
    pub session: SessionConfig,
    pub network: NetworkConfig,
    pub display: DisplayConfig,
    pub history: HistoryConfig,
}

/// Author fields sent with each post.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PostConfig {
    /// Empty posts under the board's default name.
    pub name: String,
    pub mail: String,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            mail: DEFAULT_MAIL.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    pub poll_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

/// Network/HTTP timeout policy.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NetworkConfig {
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Display / rendering preferences.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Input history persistence.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    pub persist: bool,
    /// Overrides `<config-root>/chit/history`.
    pub path: Option<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            persist: true,
            path: None,
        }
    }
}
