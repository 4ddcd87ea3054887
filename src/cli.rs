//! CLI argument parsing via clap.

use clap::Parser;
use std::path::PathBuf;

/// Follow and post to a bulletin-board thread from the terminal.
#[derive(Debug, Parser)]
#[command(name = "chit", version)]
pub struct Args {
    /// Thread to attach to, e.g. `shitaraba:///game/1234/雑談*:postable`.
    pub spec: String,

    /// Path to config file (default: ./chit.toml or ~/.config/chit/chit.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Input history file (overrides `[history] path`).
    #[arg(long = "history", value_name = "PATH")]
    pub history: Option<PathBuf>,
}
