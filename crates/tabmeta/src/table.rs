//! In-memory tabular model shared by every pipeline stage.
//!
//! A [`Table`] is an explicit ordered column list plus positional rows.
//! Cell values are tagged scalars ([`Value`]) because the schema of a
//! spreadsheet is only discovered at load time; nothing in the pipeline
//! relies on implicit attribute access.

/// A single cell value.
///
/// The metadata store transports everything as strings; [`Value::render`]
/// is the single coercion point.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text cell.
    Text(String),

    /// Floating-point cell.
    Number(f64),

    /// Integer cell (kept separate so rendering never gains a fraction).
    Integer(i64),

    /// Boolean cell.
    Bool(bool),

    /// Blank cell. Blank cells never become attributes.
    Empty,
}

impl Value {
    /// Render the value as the store's string transport type.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => {
                // Whole floats print without a trailing fraction, so a
                // spreadsheet "42" round-trips as "42" not "42.0".
                format!("{}", n)
            }
            Value::Integer(i) => i.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Empty => String::new(),
        }
    }

    /// Check if this is a blank cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// An ordered set of named columns and the rows beneath them.
///
/// Rows are stored positionally, aligned with [`Table::columns`]; use
/// [`Table::cell`] for access by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column names in source order. Unique; trimmed by the loader.
    pub columns: Vec<String>,

    /// Rows in source order, each aligned with `columns`.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given column set.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. The row must be aligned with the column list.
    ///
    /// Short rows (a trailing-blank spreadsheet artifact) are padded with
    /// [`Value::Empty`].
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Empty);
        self.rows.push(row);
    }

    /// Index of a column by name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether the table has a column with this name.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell value by row index and column name.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
