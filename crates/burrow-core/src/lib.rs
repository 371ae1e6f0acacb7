//! Core types and traits for the Burrow URL shortener.
//!
//! This crate provides the short code type, the error taxonomy and the
//! traits shared by the store, the code generators and the HTTP gateway.

pub mod error;
pub mod shortcode;
pub mod shortener;
pub mod snapshot;

pub use error::{CoreError, PersistenceError, ShortenerError};
pub use shortcode::ShortCode;
pub use shortener::Shortener;
pub use snapshot::{Snapshot, SnapshotStore};
