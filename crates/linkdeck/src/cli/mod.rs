//! # CLI Layer
//!
//! This module is **one possible client** of linkdeckapp. It is the only place
//! that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Parses arguments
//! - Installs the tracing subscriber
//! - Formats output for people
//!
//! ## Structure
//!
//! - [`setup`]: clap definitions
//! - [`commands`]: `run()`, context setup, one `handle_*` per command
//! - [`render`]: printing of `CmdResult` parts

mod commands;
mod render;
mod setup;

pub use commands::run;
