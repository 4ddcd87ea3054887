//! Raw-mode single-line editor that keeps the prompt below scrolling posts.
//!
//! Output is always written on a cleared line followed by a prompt redraw,
//! so posts arriving mid-edit never garble what the user is typing.

use crate::tui::console::{Console, LineEvent, NoticeLevel};
use crate::tui::input_buffer::{History, LineBuffer};
use crate::tui::settings;
use async_trait::async_trait;
use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Interactive console for a TTY.
pub struct TerminalConsole {
    prompt: String,
    line: LineBuffer,
    history: History,
    history_path: Option<PathBuf>,
    color: bool,
    raw: Option<RawModeGuard>,
    installed: bool,
}

impl TerminalConsole {
    pub fn new(color: bool, history_path: Option<PathBuf>) -> Self {
        Self {
            prompt: String::new(),
            line: LineBuffer::default(),
            history: History::default(),
            history_path,
            color,
            raw: None,
            installed: false,
        }
    }

    /// Load previously saved history. A missing file is not an error.
    pub fn load_history(&mut self) -> io::Result<()> {
        match &self.history_path {
            Some(path) => self.history.load_file(path),
            None => Ok(()),
        }
    }

    fn redraw(&self) -> io::Result<()> {
        if !self.installed {
            return Ok(());
        }
        let mut stdout = io::stdout();
        stdout.queue(Print("\r"))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        if self.color {
            stdout.queue(PrintStyledContent(self.prompt.as_str().bold()))?;
        } else {
            stdout.queue(Print(&self.prompt))?;
        }
        stdout.queue(Print(&self.line.text))?;
        let column = self.prompt.width() + self.line.before_cursor().width();
        stdout.queue(MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX)))?;
        stdout.flush()
    }

    fn clear_input_line(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.queue(Print("\r"))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.flush()
    }

    /// Apply one key; returns an event when the key finishes the line.
    fn handle_key(&mut self, key: KeyEvent) -> io::Result<Option<LineEvent>> {
        if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
            return Ok(None);
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Enter => {
                let text = self.line.take();
                if self.installed {
                    let mut stdout = io::stdout();
                    stdout.queue(Print("\r\n"))?;
                    stdout.flush()?;
                    self.redraw()?;
                }
                return Ok(Some(LineEvent::Line(text)));
            }
            KeyCode::Char('d') if ctrl => {
                // Ctrl-D ends input only on an empty line.
                if self.line.text.is_empty() {
                    return Ok(Some(LineEvent::Eof));
                }
                self.line.delete();
            }
            KeyCode::Char('c') if ctrl => self.line.clear(),
            KeyCode::Char('a') if ctrl => self.line.home(),
            KeyCode::Char('e') if ctrl => self.line.end(),
            KeyCode::Char('b') if ctrl => self.line.left(),
            KeyCode::Char('f') if ctrl => self.line.right(),
            KeyCode::Char('k') if ctrl => self.line.kill_to_end(),
            KeyCode::Char('u') if ctrl => self.line.kill_to_start(),
            KeyCode::Char('w') if ctrl => self.line.kill_word_back(),
            KeyCode::Char('p') if ctrl => self.line.history_up(&self.history),
            KeyCode::Char('n') if ctrl => self.line.history_down(&self.history),
            KeyCode::Char(ch) => {
                if ctrl || key.modifiers.contains(KeyModifiers::ALT) {
                    return Ok(None);
                }
                self.line.insert(ch);
            }
            KeyCode::Backspace => self.line.backspace(),
            KeyCode::Delete => self.line.delete(),
            KeyCode::Left => self.line.left(),
            KeyCode::Right => self.line.right(),
            KeyCode::Home => self.line.home(),
            KeyCode::End => self.line.end(),
            KeyCode::Up => self.line.history_up(&self.history),
            KeyCode::Down => self.line.history_down(&self.history),
            _ => return Ok(None),
        }
        self.redraw()?;
        Ok(None)
    }

    /// Drain every event that is already queued.
    fn drain_events(&mut self) -> io::Result<Option<LineEvent>> {
        loop {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(done) = self.handle_key(key)? {
                        return Ok(Some(done));
                    }
                }
                Event::Resize(_, _) => self.redraw()?,
                _ => {}
            }
            if !event::poll(Duration::ZERO)? {
                return Ok(None);
            }
        }
    }
}

#[async_trait]
impl Console for TerminalConsole {
    fn install(&mut self, prompt: &str) -> io::Result<()> {
        if self.raw.is_none() {
            self.raw = Some(RawModeGuard::acquire()?);
        }
        self.prompt = prompt.to_string();
        self.installed = true;
        self.redraw()
    }

    fn set_prompt(&mut self, prompt: &str) -> io::Result<()> {
        self.prompt = prompt.to_string();
        self.redraw()
    }

    async fn poll_line(&mut self, timeout: Duration) -> io::Result<Option<LineEvent>> {
        let ready = tokio::task::spawn_blocking(move || event::poll(timeout))
            .await
            .map_err(io::Error::other)??;
        if !ready {
            return Ok(None);
        }
        self.drain_events()
    }

    fn print_above(&mut self, text: &str) -> io::Result<()> {
        self.clear_input_line()?;
        let mut stdout = io::stdout();
        for line in text.lines() {
            stdout.queue(Print(line))?;
            stdout.queue(Print("\r\n"))?;
        }
        stdout.flush()?;
        self.redraw()
    }

    fn report(&mut self, level: NoticeLevel, message: &str) {
        let _ = self.clear_input_line();
        let (label, color) = match level {
            NoticeLevel::Info => (settings::LABEL_INFO, settings::COLOR_INFO),
            NoticeLevel::Warn => (settings::LABEL_WARNING, settings::COLOR_WARNING),
            NoticeLevel::Error => (settings::LABEL_ERROR, settings::COLOR_ERROR),
        };
        let message = message.replace('\n', "\r\n");
        if self.color {
            eprint!("\r{} {message}\r\n", label.with(color).bold());
        } else {
            eprint!("\r{label} {message}\r\n");
        }
        let _ = self.redraw();
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line);
    }

    fn uninstall(&mut self) -> io::Result<()> {
        if !self.installed {
            return Ok(());
        }
        self.installed = false;
        self.line.clear();
        self.clear_input_line()?;
        self.raw = None;
        Ok(())
    }

    fn save_history(&mut self) -> io::Result<()> {
        match &self.history_path {
            Some(path) => self.history.save_file(path),
            None => Ok(()),
        }
    }

    fn restore_terminal(&mut self) {
        self.installed = false;
        self.raw = None;
    }
}

/// Raw mode lifetime guard so terminal state is restored on any return path.
struct RawModeGuard;

impl RawModeGuard {
    /// Enable terminal raw mode and return a guard that disables it on drop.
    fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
