//! # Notekit Architecture
//!
//! Notekit is the **UI-agnostic local core** of a note-taking app. It owns two
//! things a client would otherwise re-implement per platform:
//!
//! - the **pinboard**: a single settings document listing pinned notebooks,
//!   topics and tags, written through to a document store
//! - **find and replace** inside the note being edited
//!
//! The `notekit` binary is one client of this library, not the point of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, owns the settings store       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic, returns CmdResult with owned views       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (settings.rs, search/, catalog.rs, model.rs)          │
//! │  Storage (store/): DocumentStore, FileStore, InMemoryStore  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. Diagnostics go through `tracing`; whoever embeds the library
//! decides where they end up.
//!
//! ## Testing Strategy
//!
//! 1. **Core and commands**: unit tests next to the code, against
//!    `InMemoryStore`. This is where most of the testing lives.
//! 2. **Storage**: `FileStore` tests on temp directories.
//! 3. **CLI**: end-to-end runs of the binary in `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Business logic per command
//! - [`settings`]: The pinboard settings store
//! - [`search`]: Find/replace engine
//! - [`catalog`]: Notebooks, topics and tags that pins resolve to
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Settings document and pin types
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod search;
pub mod settings;
pub mod store;
