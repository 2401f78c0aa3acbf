//! # MicroLab Architecture
//!
//! MicroLab keeps microbiology laboratory reports: it composes them, stores them
//! under a single persisted slot, lets you browse and edit them, and renders them
//! as documents. The core is a library; the `microlab` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders output, owns exit codes        │
//! │  - Installs the tracing subscriber                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Composition, readiness gate, filtering, export           │
//! │  - Operates on Rust types, returns `CmdResult`              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - `ReportStore`: ordered collection + write-through        │
//! │  - `SlotStorage` trait: FileSlots (disk), MemorySlots (test)│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Store Contract
//!
//! Every mutation of [`store::ReportStore`] rewrites the whole collection into
//! the `microbiologyReports` slot before returning. Loading never fails: an
//! absent slot is an empty store, and an unreadable one is set aside and the
//! store starts empty. If it cannot be set aside, the store refuses to write.
//! A failed write leaves the in-memory change in place and surfaces
//! [`error::MicrolabError::Persist`].
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never prints and never exits. Messages travel back
//! in `CmdResult` for the client to present. Diagnostics go through `tracing`
//! and are only visible once a subscriber is installed.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Report store and slot backends
//! - [`model`]: Report record and its enumerations
//! - [`document`]: Markdown rendering of a single report
//! - [`config`]: Lab configuration
//! - [`init`]: Data directory resolution and context setup
//! - [`error`]: Error types
//! - `cli`: Argument parsing and terminal rendering for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod init;
pub mod model;
pub mod store;
