//! Terminal user-interface building blocks.
//!
//! The session talks to a [`Console`]; the interactive implementation keeps
//! editing mechanics in `input_buffer` and terminal drawing in `input`, and
//! `render` turns posts into display text.

pub mod console;
pub mod input;
mod input_buffer;
pub mod piped;
pub mod render;
pub mod settings;

pub use console::{Console, LineEvent, NoticeLevel};
pub use input::TerminalConsole;
pub use input_buffer::History;
pub use piped::PipedConsole;
pub use render::render_post;
