//! Column filtering: which columns become metadata attributes.

use crate::config::ColumnSelection;

/// Apply a column selection to the available columns.
///
/// The target column is never filtered out: it is the row's identity, not
/// an attribute, and downstream stages need it regardless of what the
/// whitelist or blacklist says. Order of the result follows `columns`.
#[must_use]
pub fn selected_columns(
    columns: &[String],
    target_column: &str,
    selection: &ColumnSelection,
) -> Vec<String> {
    columns
        .iter()
        .filter(|column| {
            if *column == target_column {
                return true;
            }
            match selection {
                ColumnSelection::All => true,
                ColumnSelection::Whitelist(keep) => keep.contains(column),
                ColumnSelection::Blacklist(drop) => !drop.contains(column),
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_no_selection_keeps_everything() {
        let cols = columns(&["dataobject", "a", "b"]);
        assert_eq!(
            selected_columns(&cols, "dataobject", &ColumnSelection::All),
            cols
        );
    }

    #[test]
    fn test_whitelist_is_target_plus_intersection() {
        let cols = columns(&["dataobject", "a", "b", "c"]);
        let selection = ColumnSelection::Whitelist(columns(&["b", "not_present"]));

        assert_eq!(
            selected_columns(&cols, "dataobject", &selection),
            columns(&["dataobject", "b"])
        );
    }

    #[test]
    fn test_blacklist_drops_listed_columns() {
        let cols = columns(&["dataobject", "a", "b", "c"]);
        let selection = ColumnSelection::Blacklist(columns(&["a", "c"]));

        assert_eq!(
            selected_columns(&cols, "dataobject", &selection),
            columns(&["dataobject", "b"])
        );
    }

    #[test]
    fn test_target_survives_blacklist() {
        let cols = columns(&["dataobject", "a"]);
        let selection = ColumnSelection::Blacklist(columns(&["dataobject"]));

        assert_eq!(
            selected_columns(&cols, "dataobject", &selection),
            columns(&["dataobject", "a"])
        );
    }

    #[test]
    fn test_target_survives_whitelist_omission() {
        let cols = columns(&["dataobject", "a", "b"]);
        let selection = ColumnSelection::Whitelist(columns(&["a"]));

        assert_eq!(
            selected_columns(&cols, "dataobject", &selection),
            columns(&["dataobject", "a"])
        );
    }

    #[test]
    fn test_result_preserves_column_order() {
        let cols = columns(&["c", "dataobject", "a"]);
        let selection = ColumnSelection::Whitelist(columns(&["a", "c"]));

        assert_eq!(
            selected_columns(&cols, "dataobject", &selection),
            columns(&["c", "dataobject", "a"])
        );
    }
}
