//! Command-line emitter for Test Anything Protocol streams.

pub mod args;
pub mod entry;
pub mod events;
