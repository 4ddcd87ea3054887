//! Binary-local application orchestration.
//!
//! `main.rs` only parses arguments; `entry` wires config, logging, the board
//! client and the console together.

pub(crate) mod entry;
