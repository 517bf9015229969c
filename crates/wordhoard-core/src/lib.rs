//! # Wordhoard Core
//!
//! Runtime-agnostic logic for Wordhoard: data models, error taxonomy,
//! store abstraction, entry search pipeline, suggestion provider trait,
//! and the orchestration engine.
//!
//! This crate contains no tokio, HTTP client, or filesystem I/O. Concrete
//! providers and the file-backed store live in the `wordhoard` app crate.

pub mod engine;
pub mod error;
pub mod models;
pub mod provider;
pub mod search;
pub mod store;

pub use engine::{CollectionExport, Engine};
pub use error::{Error, Result};
