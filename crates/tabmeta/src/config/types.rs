//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Root configuration structure.
///
/// Written once by the setup wizard, loaded once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Sheet names to process, in processing order.
    pub sheets: Vec<String>,

    /// Delimiter for plain-text sources (default: ","). Consumed by the
    /// dataset loader; stored here for reproducibility of the run.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// How the identifier column maps to object paths.
    pub path_column: PathColumn,

    /// Columns to keep as metadata attributes. Mutually exclusive with
    /// `blacklist`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<Vec<String>>,

    /// Columns to drop from the metadata attributes. Mutually exclusive
    /// with `whitelist`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklist: Option<Vec<String>>,
}

/// Identifier-column configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathColumn {
    /// Name of the column holding the object identifier.
    pub column_name: String,

    /// How the identifier encodes the object path.
    pub path_type: PathType,

    /// Collection path under which relative/part identifiers resolve.
    /// Required unless `path_type` is `absolute`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,

    /// Name matching mode for `part` resolution (default: exact).
    #[serde(default)]
    pub match_mode: MatchMode,
}

/// Path resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathType {
    /// The column already holds absolute object paths.
    Absolute,

    /// The column holds paths relative to `workdir`.
    Relative,

    /// The column holds (part of) the object name; targets are found by
    /// querying the store under `workdir`.
    Part,
}

/// Object-name matching mode for `part` resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Identifier equals the object name.
    #[default]
    Exact,

    /// Identifier is a leading substring of the object name.
    Prefix,
}

/// Column filtering derived from a validated [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSelection {
    /// Keep every column.
    All,

    /// Keep only these columns (plus the target column).
    Whitelist(Vec<String>),

    /// Keep everything except these columns (the target column is never
    /// dropped).
    Blacklist(Vec<String>),
}

impl Config {
    /// Derive the column selection from the validated whitelist/blacklist
    /// pair.
    #[must_use]
    pub fn column_selection(&self) -> ColumnSelection {
        match (&self.whitelist, &self.blacklist) {
            (Some(w), _) => ColumnSelection::Whitelist(w.clone()),
            (None, Some(b)) => ColumnSelection::Blacklist(b.clone()),
            (None, None) => ColumnSelection::All,
        }
    }
}

// Default value functions for serde
fn default_separator() -> String {
    ",".to_string()
}
