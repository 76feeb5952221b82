//! Prefwatch - reactive and async access to key-value preference stores.
//!
//! Prefwatch layers three access styles over one preference backend:
//!
//! - One-shot async reads (`get_string`, `get_int`, ... on [`Preferences`])
//! - Continuous change streams per key, for a contains-check, or for the
//!   whole store (`watch_*`), conflated to the latest value under load
//! - Batched edits applied through a single commit ([`Preferences::edit`])
//!
//! The backend itself (durability, atomicity, change dispatch) is supplied
//! by the host through the [`store::PreferenceStore`] trait; this crate only
//! adapts its synchronous, callback-based surface into futures and streams.
//! An in-memory reference store ([`store::MemoryStore`]) is included for
//! tests.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use futures::StreamExt;
//! use prefwatch::{Preferences, store::MemoryStore};
//!
//! # async fn demo() {
//! let prefs = Preferences::new(Arc::new(MemoryStore::new()));
//!
//! prefs.edit(|batch| batch.put_int("count", 5)).await;
//!
//! // Yields 5 immediately, then a new value after every commit to "count".
//! let mut counts = prefs.watch_int("count", 0);
//! while let Some(count) = counts.next().await {
//!     println!("count is now {count:?}");
//! }
//! # }
//! ```

/// Store capability traits, the value model, and the in-memory reference
/// store.
pub mod store;

/// Change-notification streams and their listener plumbing.
pub mod watch;

/// Async facade combining one-shot reads, watch streams, and batched edits.
pub mod preferences;

pub use preferences::Preferences;
pub use store::{EditBatch, PrefError, PrefKind, PrefMap, PrefValue, Preference, PreferenceStore};
pub use watch::PrefStream;
