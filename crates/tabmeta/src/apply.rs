//! Applying one attribute map to one data object.

use tracing::debug;

use crate::extract::ResolvedRow;
use crate::store::ObjectStore;

/// Why a single row failed to apply.
///
/// Row failures are counted, never raised: the batch keeps going and the
/// report is the failure surface. The two variants keep "the object is not
/// there" distinguishable from "the store refused the write".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyFailure {
    /// No data object exists at the resolved path.
    ObjectMissing,

    /// The store rejected the lookup or the attribute-add call.
    Store(String),
}

impl std::fmt::Display for ApplyFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ObjectMissing => write!(f, "data object not found"),
            Self::Store(reason) => write!(f, "store rejected the update: {}", reason),
        }
    }
}

/// Applies attribute maps to store objects, one object at a time.
pub struct MetadataApplier<'a> {
    store: &'a dyn ObjectStore,
    dry_run: bool,
}

impl<'a> MetadataApplier<'a> {
    pub fn new(store: &'a dyn ObjectStore, dry_run: bool) -> Self {
        Self { store, dry_run }
    }

    /// Apply one row's attributes to its target object.
    ///
    /// The existence lookup runs in dry-run mode too, so a rehearsal
    /// produces the same success/failure sequence as a real run; only the
    /// mutating call is skipped. All-or-nothing per object is the store's
    /// contract, so a failure here means nothing was applied.
    pub async fn apply(&self, row: &ResolvedRow) -> Result<(), ApplyFailure> {
        match self.store.exists(&row.path).await {
            Ok(true) => {}
            Ok(false) => return Err(ApplyFailure::ObjectMissing),
            Err(e) => return Err(ApplyFailure::Store(e.to_string())),
        }

        if self.dry_run {
            debug!(path = %row.path, attributes = row.attributes.len(), "dry run, skipping write");
            return Ok(());
        }

        self.store
            .add_metadata(&row.path, &row.attributes)
            .await
            .map_err(|e| ApplyFailure::Store(e.to_string()))
    }
}
