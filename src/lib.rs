//! chit: follow and post to a bulletin-board thread from the terminal.
//!
//! A thread spec such as `shitaraba:///game/1234/雑談*:postable` names a
//! board and a title glob. [`resolve`] turns it into a concrete thread via a
//! [`board::BoardClient`], and [`session::Session`] polls that thread, prints
//! new posts above the prompt and submits typed lines, moving to the next
//! matching thread when one fills up.
//!
//! # Quick start
//!
//! ```no_run
//! use chit::board;
//! use chit::resolve::resolve;
//! use chit::spec::ThreadSpec;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let spec = ThreadSpec::parse("shitaraba:///game/1234/雑談*").unwrap();
//! let client = board::connect(&spec, Duration::from_secs(20));
//! let resolution = resolve(&spec, client.as_ref()).await.unwrap();
//! println!("{}", resolution.first().title);
//! # }
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod resolve;
pub mod session;
pub mod spec;
#[cfg(test)]
pub mod testsupport;
pub mod tui;
