//! Batch orchestration: sheets in, report out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::apply::MetadataApplier;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::extract::metadata_rows;
use crate::filter::selected_columns;
use crate::resolve::{PathResolver, TARGET_COLUMN};
use crate::store::ObjectStore;

/// A single row-level failure, kept for the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowFailure {
    /// Target object path.
    pub path: String,

    /// Human-readable failure reason.
    pub reason: String,
}

/// Outcome of one processed sheet.
///
/// Built while the sheet's rows stream through the applier, finalized when
/// they are exhausted, and never mutated afterwards. Skipped sheets (absent
/// from the source, or lacking the identifier column) get no report entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetReport {
    /// Sheet name.
    pub sheet: String,

    /// Rows whose attributes were applied (or would have been, in a dry run).
    pub applied: usize,

    /// Rows that failed to apply.
    pub errors: usize,

    /// Union of attribute keys seen, in first-seen order. Informational.
    pub attribute_keys: Vec<String>,

    /// Per-row failures, in processing order.
    pub failures: Vec<RowFailure>,
}

/// Outcome of a whole batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Whether this was a rehearsal (no mutating calls issued).
    pub dry_run: bool,

    /// Per-sheet outcomes, in processing order.
    pub sheets: Vec<SheetReport>,
}

impl RunReport {
    /// Total rows applied across all sheets.
    #[must_use]
    pub fn total_applied(&self) -> usize {
        self.sheets.iter().map(|s| s.applied).sum()
    }

    /// Total row failures across all sheets.
    #[must_use]
    pub fn total_errors(&self) -> usize {
        self.sheets.iter().map(|s| s.errors).sum()
    }

    /// Whether any processed sheet had a row failure. Callers should turn
    /// this into a non-zero exit condition.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.total_errors() > 0
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs the whole pipeline: resolve, filter, extract, apply, count.
///
/// Borrows its config and store; the store is shared for the whole run and
/// released when the runner is dropped, on success and failure alike.
pub struct BatchRunner<'a> {
    config: &'a Config,
    store: &'a dyn ObjectStore,
}

impl<'a> BatchRunner<'a> {
    pub fn new(config: &'a Config, store: &'a dyn ObjectStore) -> Self {
        Self { config, store }
    }

    /// Process every configured sheet, in declaration order.
    ///
    /// Sheets absent from the dataset or lacking the identifier column are
    /// skipped silently (logged, not counted). Row failures are counted
    /// and the batch continues; only configuration, source, and
    /// resolution-time store errors abort the run.
    pub async fn run(&self, dataset: &Dataset, dry_run: bool) -> Result<RunReport> {
        let started_at = Utc::now();
        if dry_run {
            info!("dry run: no metadata will be written");
        }

        let resolver = PathResolver::new(self.store);
        let applier = MetadataApplier::new(self.store, dry_run);
        let selection = self.config.column_selection();
        let identifier = &self.config.path_column.column_name;

        let mut sheets = Vec::new();

        for sheet_name in &self.config.sheets {
            let Some(table) = dataset.get(sheet_name) else {
                info!("sheet '{}' not present in the source, skipping", sheet_name);
                continue;
            };
            if !table.has_column(identifier) {
                info!(
                    "sheet '{}' has no '{}' column, skipping",
                    sheet_name, identifier
                );
                continue;
            }

            info!("processing sheet '{}' ({} rows)", sheet_name, table.len());

            let resolved = resolver.resolve(table, &self.config.path_column).await?;
            let keep = selected_columns(&resolved.columns, TARGET_COLUMN, &selection);

            let mut report = SheetReport {
                sheet: sheet_name.clone(),
                applied: 0,
                errors: 0,
                attribute_keys: Vec::new(),
                failures: Vec::new(),
            };

            for row in metadata_rows(&resolved, TARGET_COLUMN, &keep) {
                for (name, _) in &row.attributes {
                    if !report.attribute_keys.contains(name) {
                        report.attribute_keys.push(name.clone());
                    }
                }

                match applier.apply(&row).await {
                    Ok(()) => report.applied += 1,
                    Err(failure) => {
                        warn!("{}: {}", row.path, failure);
                        report.errors += 1;
                        report.failures.push(RowFailure {
                            path: row.path,
                            reason: failure.to_string(),
                        });
                    }
                }
            }

            info!(
                "sheet '{}': {} applied, {} errors",
                report.sheet, report.applied, report.errors
            );
            sheets.push(report);
        }

        let completed_at = Utc::now();
        let duration_seconds = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;

        let report = RunReport {
            started_at,
            completed_at,
            duration_seconds,
            dry_run,
            sheets,
        };

        info!(
            "run finished: {} applied, {} errors across {} sheets",
            report.total_applied(),
            report.total_errors(),
            report.sheets.len()
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MatchMode, PathColumn, PathType};
    use crate::dataset::Sheet;
    use crate::store::{Avu, MemoryStore};
    use crate::table::Table;

    fn relative_config(sheets: &[&str]) -> Config {
        Config {
            sheets: sheets.iter().map(|s| s.to_string()).collect(),
            separator: ",".to_string(),
            path_column: PathColumn {
                column_name: "id".to_string(),
                path_type: PathType::Relative,
                workdir: Some("/zoneA/home/projX".to_string()),
                match_mode: MatchMode::Exact,
            },
            whitelist: None,
            blacklist: None,
        }
    }

    fn single_sheet_dataset() -> Dataset {
        let mut table = Table::new(vec!["id".into(), "tag".into()]);
        table.push_row(vec!["a.txt".into(), "one".into()]);
        table.push_row(vec!["b.txt".into(), "two".into()]);
        Dataset {
            sheets: vec![Sheet {
                name: "single_sheet".to_string(),
                table,
            }],
        }
    }

    #[tokio::test]
    async fn test_relative_run_applies_everything() {
        let store = MemoryStore::new();
        store.insert_object("/zoneA/home/projX/a.txt").await;
        store.insert_object("/zoneA/home/projX/b.txt").await;

        let config = relative_config(&["single_sheet"]);
        let report = BatchRunner::new(&config, &store)
            .run(&single_sheet_dataset(), false)
            .await
            .unwrap();

        assert_eq!(report.sheets.len(), 1);
        let sheet = &report.sheets[0];
        assert_eq!(sheet.applied, 2);
        assert_eq!(sheet.errors, 0);
        assert_eq!(sheet.attribute_keys, vec!["tag"]);
        assert!(!report.has_errors());

        assert_eq!(
            store.attributes_of("/zoneA/home/projX/a.txt").await.unwrap(),
            vec![Avu::new("tag", "one")]
        );
        assert_eq!(
            store.attributes_of("/zoneA/home/projX/b.txt").await.unwrap(),
            vec![Avu::new("tag", "two")]
        );
    }

    #[tokio::test]
    async fn test_one_failing_object_does_not_stop_the_batch() {
        let store = MemoryStore::new();
        // b.txt is missing from the store
        store.insert_object("/zoneA/home/projX/a.txt").await;

        let config = relative_config(&["single_sheet"]);
        let report = BatchRunner::new(&config, &store)
            .run(&single_sheet_dataset(), false)
            .await
            .unwrap();

        let sheet = &report.sheets[0];
        assert_eq!(sheet.applied, 1);
        assert_eq!(sheet.errors, 1);
        assert_eq!(sheet.failures.len(), 1);
        assert_eq!(sheet.failures[0].path, "/zoneA/home/projX/b.txt");
        assert!(report.has_errors());

        // The surviving row was still applied
        assert_eq!(
            store.attributes_of("/zoneA/home/projX/a.txt").await.unwrap(),
            vec![Avu::new("tag", "one")]
        );
    }

    #[tokio::test]
    async fn test_part_with_no_matches_reports_zeroes() {
        let store = MemoryStore::new();

        let mut config = relative_config(&["single_sheet"]);
        config.path_column.path_type = PathType::Part;

        let report = BatchRunner::new(&config, &store)
            .run(&single_sheet_dataset(), false)
            .await
            .unwrap();

        let sheet = &report.sheets[0];
        assert_eq!(sheet.applied, 0);
        assert_eq!(sheet.errors, 0);
        assert!(!report.has_errors());
    }

    #[tokio::test]
    async fn test_missing_sheets_and_columns_are_skipped() {
        let store = MemoryStore::new();
        store.insert_object("/zoneA/home/projX/a.txt").await;
        store.insert_object("/zoneA/home/projX/b.txt").await;

        let mut dataset = single_sheet_dataset();
        // A sheet without the identifier column
        dataset.sheets.push(Sheet {
            name: "no_id".to_string(),
            table: Table::new(vec!["other".into()]),
        });

        let config = relative_config(&["ghost_sheet", "no_id", "single_sheet"]);
        let report = BatchRunner::new(&config, &store)
            .run(&dataset, false)
            .await
            .unwrap();

        // Only the processable sheet is reported
        assert_eq!(report.sheets.len(), 1);
        assert_eq!(report.sheets[0].sheet, "single_sheet");
        assert!(!report.has_errors());
    }

    #[tokio::test]
    async fn test_dry_run_counts_match_but_store_is_untouched() {
        let store = MemoryStore::new();
        store.insert_object("/zoneA/home/projX/a.txt").await;

        let config = relative_config(&["single_sheet"]);
        let report = BatchRunner::new(&config, &store)
            .run(&single_sheet_dataset(), true)
            .await
            .unwrap();

        assert!(report.dry_run);
        let sheet = &report.sheets[0];
        // a.txt exists, b.txt does not: same shape as a real run
        assert_eq!(sheet.applied, 1);
        assert_eq!(sheet.errors, 1);

        assert!(store
            .attributes_of("/zoneA/home/projX/a.txt")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_blacklist_drops_attribute_columns() {
        let store = MemoryStore::new();
        store.insert_object("/zoneA/home/projX/a.txt").await;
        store.insert_object("/zoneA/home/projX/b.txt").await;

        let mut config = relative_config(&["single_sheet"]);
        config.blacklist = Some(vec!["tag".to_string()]);

        let report = BatchRunner::new(&config, &store)
            .run(&single_sheet_dataset(), false)
            .await
            .unwrap();

        assert_eq!(report.sheets[0].applied, 2);
        assert!(report.sheets[0].attribute_keys.is_empty());
        assert!(store
            .attributes_of("/zoneA/home/projX/a.txt")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_report_serializes_to_json() {
        let store = MemoryStore::new();
        let config = relative_config(&["single_sheet"]);
        let report = BatchRunner::new(&config, &store)
            .run(&Dataset::default(), false)
            .await
            .unwrap();

        let json = report.to_json().unwrap();
        assert!(json.contains("\"sheets\""));
        assert!(json.contains("\"dry_run\""));
    }
}
