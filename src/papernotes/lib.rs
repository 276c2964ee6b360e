//! # Papernotes Architecture
//!
//! Papernotes is a **UI-agnostic catalog of research-paper notes**. It keeps one record
//! per paper (title, authors, year, how it was found, notes, points to revisit, and two
//! links) in a single JSON database, and can export that database, import a replacement,
//! keep a backup copy, and project the records to a CSV report.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (selector strings → RecordSelector)    │
//! │  - Fail-soft boundary for whole-database operations         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic, returns CmdResult                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - RecordStore over a key/value StorageBackend              │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CSV projector ([`csv`]) is a pure function over snapshot text and depends on
//! nothing but the [`snapshot`] format.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments, returns `Result<CmdResult>`,
//! and never writes to stdout/stderr. Diagnostics go through `tracing`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Storage abstraction, backends and the record store
//! - [`model`]: Core data types (`Record`, `PaperFields`, `RecordPatch`)
//! - [`snapshot`]: The persisted database document
//! - [`csv`]: CSV report projection
//! - [`filter`]: Record queries
//! - [`index`]: List numbering and record selectors
//! - [`config`]: Configuration management
//! - [`init`]: Data directory discovery and wiring
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod csv;
pub mod error;
pub mod filter;
pub mod index;
pub mod init;
pub mod model;
pub mod snapshot;
pub mod store;
