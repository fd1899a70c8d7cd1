//! Path resolution: turning the configured identifier column into fully
//! qualified data-object paths.
//!
//! Three strategies share one output shape: a table whose target column is
//! uniformly named [`TARGET_COLUMN`], other columns untouched. `absolute`
//! and `relative` are purely syntactic; `part` asks the store's index,
//! because the tabular source may only carry a fragment of the real object
//! name (a filename without its extension or timestamp suffix), so static
//! path construction is impossible.

use tracing::debug;

use crate::config::{MatchMode, PathColumn, PathType};
use crate::error::{Result, TabmetaError};
use crate::store::ObjectStore;
use crate::table::{Table, Value};

/// Name of the resolved target-identifier column.
pub const TARGET_COLUMN: &str = "dataobject";

/// Resolves identifier columns against an object store.
pub struct PathResolver<'a> {
    store: &'a dyn ObjectStore,
}

impl<'a> PathResolver<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self { store }
    }

    /// Resolve `table`'s identifier column according to `path_column`.
    ///
    /// The returned table carries the same columns with the identifier
    /// column renamed to [`TARGET_COLUMN`] in place. Row cardinality is
    /// preserved except under [`PathType::Part`], where each source row
    /// contributes one output row per store match (possibly zero).
    pub async fn resolve(&self, table: &Table, path_column: &PathColumn) -> Result<Table> {
        let id_idx = table.column_index(&path_column.column_name).ok_or_else(|| {
            TabmetaError::config(format!(
                "identifier column '{}' not found in table",
                path_column.column_name
            ))
        })?;

        let mut columns = table.columns.clone();
        columns[id_idx] = TARGET_COLUMN.to_string();
        let mut resolved = Table::new(columns);

        match path_column.path_type {
            PathType::Absolute => {
                // Rename only; the column already holds full paths.
                for row in &table.rows {
                    resolved.push_row(row.clone());
                }
            }
            PathType::Relative => {
                // Validation guarantees workdir for non-absolute types.
                // Cardinality stays 1:1; whether the joined path exists is
                // only checked at apply time.
                let workdir = path_column.workdir.as_deref().unwrap_or_default();
                for row in &table.rows {
                    let identifier = row[id_idx].render();
                    let mut out = row.clone();
                    out[id_idx] = Value::Text(join_under(workdir, &identifier));
                    resolved.push_row(out);
                }
            }
            PathType::Part => {
                let workdir = path_column.workdir.as_deref().unwrap_or_default();
                let exact = path_column.match_mode == MatchMode::Exact;
                for row in &table.rows {
                    let identifier = row[id_idx].render();
                    if identifier.is_empty() {
                        // A blank identifier would prefix-match every object
                        // under workdir; treat it as matching nothing.
                        debug!("skipping row with blank identifier");
                        continue;
                    }
                    let matches = self.store.search(workdir, &identifier, exact).await?;
                    if matches.len() > 1 {
                        debug!(
                            identifier = %identifier,
                            matches = matches.len(),
                            "identifier matched multiple data objects"
                        );
                    }
                    for out in expand_row(row, id_idx, &matches) {
                        resolved.push_row(out);
                    }
                }
            }
        }

        Ok(resolved)
    }
}

/// One source row becomes one output row per match, the identifier cell
/// replaced by the matched path and every other cell copied verbatim.
/// Zero matches yield zero rows.
fn expand_row(row: &[Value], id_idx: usize, matches: &[String]) -> Vec<Vec<Value>> {
    matches
        .iter()
        .map(|path| {
            let mut out = row.to_vec();
            out[id_idx] = Value::Text(path.clone());
            out
        })
        .collect()
}

fn join_under(workdir: &str, identifier: &str) -> String {
    format!(
        "{}/{}",
        workdir.trim_end_matches('/'),
        identifier.trim_start_matches('/')
    )
}
