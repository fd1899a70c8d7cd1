//! Turning a resolved, filtered table into per-row metadata instructions.

use crate::table::Table;

/// One metadata-application instruction: a target object and the
/// attributes to attach to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRow {
    /// Fully qualified data-object path.
    pub path: String,

    /// Attribute pairs in column order. Never contains the target column;
    /// blank cells are omitted.
    pub attributes: Vec<(String, String)>,
}

/// Lazily iterate `table` as [`ResolvedRow`]s.
///
/// `keep_columns` is the filtered column set (target column included);
/// everything else in the table is ignored. The iterator borrows the
/// table, so it can be restarted by calling this again.
pub fn metadata_rows<'a>(
    table: &'a Table,
    target_column: &str,
    keep_columns: &'a [String],
) -> MetadataRows<'a> {
    // Pre-compute (name, index) for the kept attribute columns so each row
    // is a straight scan.
    let attribute_columns: Vec<(&'a str, usize)> = keep_columns
        .iter()
        .filter(|name| name.as_str() != target_column)
        .filter_map(|name| table.column_index(name).map(|idx| (name.as_str(), idx)))
        .collect();
    let target_idx = table.column_index(target_column);

    MetadataRows {
        table,
        target_idx,
        attribute_columns,
        next_row: 0,
    }
}

/// Iterator returned by [`metadata_rows`].
pub struct MetadataRows<'a> {
    table: &'a Table,
    target_idx: Option<usize>,
    attribute_columns: Vec<(&'a str, usize)>,
    next_row: usize,
}

impl Iterator for MetadataRows<'_> {
    type Item = ResolvedRow;

    fn next(&mut self) -> Option<Self::Item> {
        let target_idx = self.target_idx?;
        let row = self.table.rows.get(self.next_row)?;
        self.next_row += 1;

        let path = row[target_idx].render();
        let attributes = self
            .attribute_columns
            .iter()
            .filter(|(_, idx)| !row[*idx].is_empty())
            .map(|(name, idx)| (name.to_string(), row[*idx].render()))
            .collect();

        Some(ResolvedRow { path, attributes })
    }
}
