//! Storage for issued short codes.
//!
//! [`ShortCodeStore`] keeps the `code -> url` mapping in memory behind a
//! single lock and writes full snapshots through a [`SnapshotStore`]
//! backend after every insert. A [`Flusher`] adds a periodic flush on top.
//!
//! ```rust,no_run
//! use burrow_generator::RandomGenerator;
//! use burrow_storage::{JsonFileSnapshotStore, ShortCodeStore, StoreSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let snapshots = JsonFileSnapshotStore::new("urlstore.json");
//! let store = ShortCodeStore::load(
//!     snapshots,
//!     RandomGenerator::new(),
//!     StoreSettings::builder().build(),
//! )
//! .await?;
//!
//! let code = store.insert("https://example.com/a").await?;
//! assert_eq!(
//!     store.lookup(code.as_str()).as_deref(),
//!     Some("https://example.com/a")
//! );
//! # Ok(())
//! # }
//! ```

pub mod flusher;
pub mod snapshot;
pub mod store;

pub use burrow_core::{PersistenceError, Snapshot, SnapshotStore};
pub use flusher::{Flusher, FlusherSettings};
pub use snapshot::{JsonFileSnapshotStore, MemorySnapshotStore};
pub use store::{ShortCodeStore, StoreSettings};
