//! Centralized, hardcoded UI settings for the terminal interface.
//!
//! This is the single place to tweak prompt strings, labels, colors, and
//! post layout glyphs.

use crossterm::style::Color;

// ---------------------------------------------------------------------------
// Layout / indentation
// ---------------------------------------------------------------------------

pub const BODY_INDENT: &str = "    ";

// ---------------------------------------------------------------------------
// Prompt strings
// ---------------------------------------------------------------------------

pub const PROMPT_SUFFIX: &str = "> ";

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

pub const LABEL_INFO: &str = "•";
pub const LABEL_WARNING: &str = "warning:";
pub const LABEL_ERROR: &str = "error:";

// ---------------------------------------------------------------------------
// Post layouts
// ---------------------------------------------------------------------------

/// Separator between header fields in the multi-line layout.
pub const HEADER_SEPARATOR: &str = "：";
/// Separator between number and body in the inline layouts.
pub const INLINE_SEPARATOR: &str = " : ";
pub const POSTER_ID_PREFIX: &str = " ID:";

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

pub const COLOR_POST_NUMBER: Color = Color::Cyan;
pub const COLOR_POST_MAIL: Color = Color::DarkGrey;
pub const COLOR_POST_TIME: Color = Color::DarkGrey;

pub const COLOR_INFO: Color = Color::DarkGrey;
pub const COLOR_WARNING: Color = Color::Yellow;
pub const COLOR_ERROR: Color = Color::Red;

// ---------------------------------------------------------------------------
// Small helpers
// ---------------------------------------------------------------------------

/// Prompt shown while attached to a thread.
pub fn thread_prompt_text(title: &str) -> String {
    format!("{title}{PROMPT_SUFFIX}")
}
