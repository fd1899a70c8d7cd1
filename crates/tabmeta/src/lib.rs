//! # tabmeta
//!
//! Bulk metadata application from tabular files to a hierarchical object
//! store.
//!
//! A declarative configuration maps each sheet of a spreadsheet (or a
//! delimited text file) onto data objects in the store: one column
//! identifies the target object, every other kept column becomes an
//! attribute/value pair attached to it. The pipeline resolves identifiers
//! to full object paths (syntactically, or by querying the store's index),
//! then applies the attributes row by row, counting partial failures
//! instead of aborting on them.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tabmeta::{BatchRunner, Config, Dataset, SnapshotStore};
//!
//! #[tokio::main]
//! async fn main() -> tabmeta::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let dataset = Dataset::load("samples.xlsx", &config.separator)?;
//!     let store = SnapshotStore::load("store.json")?;
//!
//!     let report = BatchRunner::new(&config, &store).run(&dataset, false).await?;
//!     println!("{} rows applied", report.total_applied());
//!     Ok(())
//! }
//! ```

pub mod apply;
pub mod config;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod filter;
pub mod resolve;
pub mod runner;
pub mod store;
pub mod table;

// Re-exports for convenient access
pub use apply::{ApplyFailure, MetadataApplier};
pub use config::{ColumnSelection, Config, MatchMode, PathColumn, PathType};
pub use dataset::{Dataset, Sheet, SINGLE_SHEET};
pub use error::{Result, TabmetaError};
pub use extract::{metadata_rows, ResolvedRow};
pub use resolve::{PathResolver, TARGET_COLUMN};
pub use runner::{BatchRunner, RowFailure, RunReport, SheetReport};
pub use store::{Avu, MemoryStore, ObjectStore, SnapshotStore, StoreSnapshot};
pub use table::{Table, Value};
