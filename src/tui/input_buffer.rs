//! Editable input buffer and history helpers.

use std::fs;
use std::io;
use std::path::Path;

const MAX_HISTORY: usize = 1000;

/// Submitted lines, oldest first.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    /// Add a line to history, skipping blanks and immediate repeats.
    pub fn push(&mut self, entry: &str) {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            return;
        }

        if self.entries.last().map(|s| s.as_str()) == Some(entry) {
            return;
        }

        self.entries.push(entry.to_string());
        if self.entries.len() > MAX_HISTORY {
            let overflow = self.entries.len() - MAX_HISTORY;
            self.entries.drain(0..overflow);
        }
    }

    /// Load persisted history entries from disk.
    ///
    /// Supports both JSON array (`["line1", "line2"]`) and plain line-based
    /// text files. A missing file leaves history empty.
    pub fn load_file(&mut self, path: &Path) -> io::Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let raw = fs::read_to_string(path)?;
        self.entries.clear();

        if raw.trim().is_empty() {
            return Ok(());
        }

        if let Ok(entries) = serde_json::from_str::<Vec<String>>(&raw) {
            for entry in entries {
                self.push(&entry);
            }
            return Ok(());
        }

        for line in raw.lines() {
            self.push(line);
        }
        Ok(())
    }

    /// Persist history entries to disk as a compact JSON array.
    pub fn save_file(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let encoded = serde_json::to_string(&self.entries).map_err(|err| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to encode history: {err}"),
            )
        })?;
        fs::write(path, format!("{encoded}\n"))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

/// Single-line editor state: text, cursor, and history navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LineBuffer {
    pub(crate) text: String,
    /// Cursor position in chars, not bytes.
    pub(crate) cursor: usize,
    history_index: Option<usize>,
    history_draft: String,
}

impl LineBuffer {
    /// Take the finished line and reset for the next one.
    pub(crate) fn take(&mut self) -> String {
        let line = std::mem::take(&mut self.text);
        *self = Self::default();
        line
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn insert(&mut self, ch: char) {
        let byte_idx = byte_index_at_char(&self.text, self.cursor);
        self.text.insert(byte_idx, ch);
        self.cursor += 1;
        self.history_index = None;
    }

    pub(crate) fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.delete_range(self.cursor - 1, self.cursor);
        self.cursor -= 1;
    }

    pub(crate) fn delete(&mut self) {
        if self.cursor < char_count(&self.text) {
            self.delete_range(self.cursor, self.cursor + 1);
        }
    }

    pub(crate) fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub(crate) fn right(&mut self) {
        if self.cursor < char_count(&self.text) {
            self.cursor += 1;
        }
    }

    pub(crate) fn home(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn end(&mut self) {
        self.cursor = char_count(&self.text);
    }

    /// Emacs-style kill-to-end-of-line.
    pub(crate) fn kill_to_end(&mut self) {
        let end = char_count(&self.text);
        self.delete_range(self.cursor, end);
    }

    /// Emacs-style kill-to-start-of-line.
    pub(crate) fn kill_to_start(&mut self) {
        self.delete_range(0, self.cursor);
        self.cursor = 0;
    }

    /// Emacs-style backward-kill-word.
    pub(crate) fn kill_word_back(&mut self) {
        let start = previous_word_start(&self.text, self.cursor);
        self.delete_range(start, self.cursor);
        self.cursor = start;
    }

    /// Move one entry back in history, stashing the in-progress line.
    pub(crate) fn history_up(&mut self, history: &History) {
        if history.is_empty() {
            return;
        }
        match self.history_index {
            Some(idx) => {
                if idx > 0 {
                    self.history_index = Some(idx - 1);
                }
            }
            None => {
                self.history_draft = self.text.clone();
                self.history_index = Some(history.len() - 1);
            }
        }
        if let Some(idx) = self.history_index {
            self.text = history.entries()[idx].clone();
            self.cursor = char_count(&self.text);
        }
    }

    /// Move one entry forward, restoring the stashed line past the end.
    pub(crate) fn history_down(&mut self, history: &History) {
        let Some(idx) = self.history_index else {
            return;
        };
        if idx + 1 < history.len() {
            self.history_index = Some(idx + 1);
            self.text = history.entries()[idx + 1].clone();
        } else {
            self.history_index = None;
            self.text = std::mem::take(&mut self.history_draft);
        }
        self.cursor = char_count(&self.text);
    }

    /// Text left of the cursor, used to place the terminal cursor.
    pub(crate) fn before_cursor(&self) -> &str {
        &self.text[..byte_index_at_char(&self.text, self.cursor)]
    }

    fn delete_range(&mut self, start_char: usize, end_char: usize) {
        if start_char >= end_char {
            return;
        }
        let start = byte_index_at_char(&self.text, start_char);
        let end = byte_index_at_char(&self.text, end_char);
        self.text.replace_range(start..end, "");
        self.history_index = None;
    }
}

/// Return the char index where the previous word starts.
fn previous_word_start(buffer: &str, cursor: usize) -> usize {
    let chars: Vec<char> = buffer.chars().take(cursor).collect();
    let mut idx = chars.len();
    while idx > 0 && chars[idx - 1].is_whitespace() {
        idx -= 1;
    }
    while idx > 0 && !chars[idx - 1].is_whitespace() {
        idx -= 1;
    }
    idx
}

pub(crate) fn char_count(s: &str) -> usize {
    s.chars().count()
}

fn byte_index_at_char(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(idx, _)| idx)
}
