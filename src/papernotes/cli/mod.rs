//! # CLI Layer
//!
//! This module is **one possible UI client** for papernotes, not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin prompts)
//! - Installs the log subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `setup.rs`: clap definitions and the version string
//! - `commands.rs`: `run()`, context wiring and the `handle_*()` dispatch targets
//! - `render.rs`: turns `CmdResult`s into terminal output

mod commands;
mod render;
mod setup;

pub use commands::run;
