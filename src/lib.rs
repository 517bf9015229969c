//! # Wordhoard
//!
//! **Capture words and images, gather AI vocabulary alternatives, and keep
//! the ones you like in taggable, searchable collections.**
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────────┐   ┌───────────────┐
//! │    CLI    │──▶│    Engine    │──▶│   FileStore   │
//! │(wordhoard)│   │ (core crate) │   │ JSON snapshot │
//! └───────────┘   └──────┬───────┘   └───────────────┘
//!                        │
//!                        ▼
//!                 ┌──────────────┐
//!                 │   Provider   │
//!                 │ stub/OpenAI  │
//!                 └──────────────┘
//! ```
//!
//! ## Data Flow
//!
//! 1. `input add` captures an expression, explanation, or image URL.
//! 2. `suggest` asks the configured [`provider`] for candidates.
//! 3. `entry save` files an input/suggestion pair into a collection with tags.
//! 4. `entry search` filters by substring, tags, and collection, newest first.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`provider`] | Stub and OpenAI-compatible suggestion providers |
//! | [`prompt`] | Prompt construction and completion parsing |
//! | [`file_store`] | JSON-snapshot `Store` implementation |
//! | [`app`] | Engine construction from config |
//! | [`inputs`] | `input` / `suggest` / `refine` commands |
//! | [`collections`] | `collection` commands |
//! | [`entries`] | `entry` commands |
//! | [`export`] | JSON export of one collection |
//! | [`stats`] | Collection, entry, and candidate counts |

pub mod app;
pub mod collections;
pub mod config;
pub mod entries;
pub mod export;
pub mod file_store;
pub mod inputs;
pub mod logging;
pub mod prompt;
pub mod provider;
pub mod stats;

pub use wordhoard_core::{engine, error, models, search, store};
