//! Built-in configuration defaults.

/// Seconds between thread polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 7;
/// Contact field sent with every post; `sage` keeps the thread from rising.
pub const DEFAULT_MAIL: &str = "sage";
/// Per-request HTTP timeout for board traffic.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;

/// Directory under the config root that holds chit's files.
pub(super) const APP_DIR_NAME: &str = "chit";
pub(super) const CONFIG_FILE_NAME: &str = "chit.toml";
pub(super) const HISTORY_FILE_NAME: &str = "history";
