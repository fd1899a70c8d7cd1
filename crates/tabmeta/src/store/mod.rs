//! Object store access.
//!
//! [`ObjectStore`] is the capability set the pipeline consumes from the
//! remote hierarchical store: existence lookup, subtree search, and
//! atomic add-only metadata application. Two implementations ship with
//! the crate: [`MemoryStore`] (fixtures, tests) and [`SnapshotStore`]
//! (a JSON document on disk, so runs can be rehearsed end to end without
//! a live store).

mod memory;
mod snapshot;

pub use memory::MemoryStore;
pub use snapshot::{SnapshotStore, StoreSnapshot};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An attribute/value pair attached to a data object.
///
/// The store's metadata model is AVU-shaped (attribute, value, optional
/// unit); units are not part of this pipeline's transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avu {
    pub name: String,
    pub value: String,
}

impl Avu {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Capability set consumed from the remote store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether a data object exists at `path`.
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Find data objects anywhere under the collection subtree rooted at
    /// `workdir` whose name equals (`exact_match`) or starts with
    /// (`!exact_match`) `identifier`.
    ///
    /// Result order is stable for a given store state; callers do not
    /// re-sort.
    async fn search(
        &self,
        workdir: &str,
        identifier: &str,
        exact_match: bool,
    ) -> Result<Vec<String>>;

    /// Atomically add all `attributes` to the object at `path`.
    ///
    /// All-or-nothing per object: on error, none of the attributes have
    /// been applied. Adding an exact duplicate (name, value) pair is a
    /// no-op.
    async fn add_metadata(&self, path: &str, attributes: &[(String, String)]) -> Result<()>;
}
