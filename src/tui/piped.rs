//! Console for non-interactive stdin/stdout.

use crate::tui::console::{Console, LineEvent, NoticeLevel};
use crate::tui::input_buffer::History;
use crate::tui::settings;
use async_trait::async_trait;
use crossterm::style::Stylize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Reads whole lines from stdin; prints posts to stdout and notices to stderr.
pub struct PipedConsole {
    lines: Lines<BufReader<Stdin>>,
    history: History,
    history_path: Option<PathBuf>,
    color: bool,
}

impl PipedConsole {
    pub fn new(color: bool, history_path: Option<PathBuf>) -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            history: History::default(),
            history_path,
            color,
        }
    }

    pub fn load_history(&mut self) -> io::Result<()> {
        match &self.history_path {
            Some(path) => self.history.load_file(path),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Console for PipedConsole {
    fn install(&mut self, _prompt: &str) -> io::Result<()> {
        Ok(())
    }

    fn set_prompt(&mut self, _prompt: &str) -> io::Result<()> {
        Ok(())
    }

    async fn poll_line(&mut self, timeout: Duration) -> io::Result<Option<LineEvent>> {
        // `next_line` is cancel-safe, so a timeout never loses a partial line.
        match tokio::time::timeout(timeout, self.lines.next_line()).await {
            Err(_) => Ok(None),
            Ok(Ok(Some(line))) => Ok(Some(LineEvent::Line(line))),
            Ok(Ok(None)) => Ok(Some(LineEvent::Eof)),
            Ok(Err(err)) => Err(err),
        }
    }

    fn print_above(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")?;
        stdout.flush()
    }

    fn report(&mut self, level: NoticeLevel, message: &str) {
        let label = match level {
            NoticeLevel::Info => settings::LABEL_INFO,
            NoticeLevel::Warn => settings::LABEL_WARNING,
            NoticeLevel::Error => settings::LABEL_ERROR,
        };
        if self.color {
            let color = match level {
                NoticeLevel::Info => settings::COLOR_INFO,
                NoticeLevel::Warn => settings::COLOR_WARNING,
                NoticeLevel::Error => settings::COLOR_ERROR,
            };
            eprintln!("{} {message}", label.with(color).bold());
        } else {
            eprintln!("{label} {message}");
        }
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line);
    }

    fn uninstall(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn save_history(&mut self) -> io::Result<()> {
        match &self.history_path {
            Some(path) => self.history.save_file(path),
            None => Ok(()),
        }
    }

    fn restore_terminal(&mut self) {}
}
