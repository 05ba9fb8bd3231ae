//! In-memory storage backend using a `BTreeMap` and petgraph.
//!
//! All data is held in RAM and **lost when the process exits** unless it is
//! written out with [`save_to_jsonl`]. The JSONL backend in
//! [`crate::storage`] wraps this store and does that on `save()`.
//!
//! # Architecture
//!
//! - `BTreeMap<TaskId, Task>` holds the authoritative tasks, in id order
//! - [`TaskGraph`](crate::graph::TaskGraph) is the derived adjacency index used
//!   for cycle checks and dependents lookups
//! - ids are allocated monotonically from a counter seeded with the highest
//!   id seen
//!
//! # Thread Safety
//!
//! The inner store is wrapped in `Arc<Mutex<_>>`. Every operation holds the
//! lock for its whole duration, so validation and the write it gates are a
//! single critical section.

mod inner;
mod jsonl;
mod trait_impl;

use crate::storage::TaskStore;
use inner::InMemoryStoreInner;
use std::sync::Arc;
use tokio::sync::Mutex;

pub use jsonl::{LoadWarning, load_from_jsonl, save_to_jsonl};

/// Thread-safe in-memory storage.
pub(crate) type InMemoryStore = Arc<Mutex<InMemoryStoreInner>>;

/// Create a new, empty in-memory store.
///
/// # Example
///
/// ```
/// use tasklane::storage::in_memory::new_in_memory_storage;
///
/// let store = new_in_memory_storage();
/// # drop(store);
/// ```
pub fn new_in_memory_storage() -> Box<dyn TaskStore> {
    Box::new(Arc::new(Mutex::new(InMemoryStoreInner::new())))
}
