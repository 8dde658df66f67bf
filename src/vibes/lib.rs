//! # Vibes Architecture
//!
//! Vibes manages a small collection of "vibe" records (title, description, category)
//! kept in a Cosmos DB container. The console menu is one client of a UI-agnostic core.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, runs the menu, prompts, renders        │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, owns the store                │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Validation, ordering, the numbered removal flow          │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Narrow VibeStore trait                                   │
//! │  - CosmosStore (production), InMemoryStore (testing)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordinals
//!
//! Users pick vibes by their position in a listing, not by UUID. See [`index`].
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments, returns `Result<CmdResult>`, and
//! never prints or exits. Diagnostics go through `tracing` only.
//!
//! ## Testing Strategy
//!
//! - **Commands and flows**: against `InMemoryStore` and its fixtures
//! - **Cosmos backend**: request signing and status mapping, no live database
//! - **CLI**: the menu loop over scripted input, plus binary tests in `tests/`

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod model;
pub mod store;
