//! The console contract the session drives.

use async_trait::async_trait;
use std::io;
use std::time::Duration;

/// Outcome of waiting for user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// A completed line, without its terminator.
    Line(String),
    /// The user closed input.
    Eof,
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// Line-oriented terminal surface: a prompt with an editable line, and
/// output that scrolls above it.
#[async_trait]
pub trait Console: Send {
    /// Take over the terminal and show `prompt`.
    fn install(&mut self, prompt: &str) -> io::Result<()>;

    /// Replace the prompt and redraw the input line.
    fn set_prompt(&mut self, prompt: &str) -> io::Result<()>;

    /// Wait at most `timeout` for input.
    ///
    /// `Ok(None)` means no line completed in time; partial input is kept for
    /// the next call.
    async fn poll_line(&mut self, timeout: Duration) -> io::Result<Option<LineEvent>>;

    /// Print `text` above the prompt, leaving the input line intact.
    fn print_above(&mut self, text: &str) -> io::Result<()>;

    /// Show a notice to the user. Best effort.
    fn report(&mut self, level: NoticeLevel, message: &str);

    /// Remember a submitted line for recall.
    fn add_history(&mut self, line: &str);

    /// Remove the prompt. No further input is read.
    fn uninstall(&mut self) -> io::Result<()>;

    /// Persist recalled lines, if persistence is configured.
    fn save_history(&mut self) -> io::Result<()>;

    /// Return the terminal to its normal mode. Safe to call repeatedly.
    fn restore_terminal(&mut self);
}
