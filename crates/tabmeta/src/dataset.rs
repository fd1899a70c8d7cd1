//! Loading tabular sources into [`Table`]s.
//!
//! Accepted sources: `.xlsx` workbooks (one table per sheet) and `.csv` /
//! `.tsv` plain-text files (a single sheet named `single_sheet`, split on
//! the configured separator). Header names are whitespace-trimmed here so
//! the rest of the pipeline can assume trimmed column names.

use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use tracing::debug;

use crate::error::{Result, TabmetaError};
use crate::table::{Table, Value};

/// Sheet name given to delimited (non-workbook) sources.
pub const SINGLE_SHEET: &str = "single_sheet";

/// A named table.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub table: Table,
}

/// A named, ordered collection of tables; one per source sheet.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub sheets: Vec<Sheet>,
}

impl Dataset {
    /// Load a tabular file, dispatching on its extension.
    ///
    /// `separator` applies to plain-text sources only.
    pub fn load<P: AsRef<Path>>(path: P, separator: &str) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" => Self::from_xlsx(path),
            "csv" | "tsv" => Self::from_delimited(path, separator),
            other => Err(TabmetaError::source(format!(
                "unsupported file type '{}' (expected .xlsx, .csv or .tsv): {}",
                other,
                path.display()
            ))),
        }
    }

    /// Load every sheet of an `.xlsx` workbook.
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e| TabmetaError::source(format!("{}: {}", path.display(), e)))?;

        let mut sheets = Vec::new();
        let names = workbook.sheet_names().to_vec();
        for name in names {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| TabmetaError::source(format!("sheet '{}': {}", name, e)))?;

            let mut rows = range.rows();
            let Some(header) = rows.next() else {
                debug!("sheet '{}' is empty, keeping it with no columns", name);
                sheets.push(Sheet {
                    name,
                    table: Table::new(Vec::new()),
                });
                continue;
            };

            let columns = header_names(
                header.iter().map(|cell| convert_cell(cell).render()),
                &name,
            )?;
            let mut table = Table::new(columns);

            for row in rows {
                let values: Vec<Value> = row.iter().map(convert_cell).collect();
                if values.iter().all(Value::is_empty) {
                    continue;
                }
                table.push_row(values);
            }

            sheets.push(Sheet { name, table });
        }

        Ok(Self { sheets })
    }

    /// Load a delimited plain-text file as a single sheet.
    pub fn from_delimited<P: AsRef<Path>>(path: P, separator: &str) -> Result<Self> {
        let path = path.as_ref();
        let delimiter = delimiter_byte(separator)?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_path(path)
            .map_err(|e| TabmetaError::source(format!("{}: {}", path.display(), e)))?;

        let headers = reader
            .headers()
            .map_err(|e| TabmetaError::source(format!("{}: {}", path.display(), e)))?
            .clone();
        let columns = header_names(headers.iter().map(str::to_string), SINGLE_SHEET)?;

        let mut table = Table::new(columns);
        for record in reader.records() {
            let record =
                record.map_err(|e| TabmetaError::source(format!("{}: {}", path.display(), e)))?;
            let values: Vec<Value> = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Value::Empty
                    } else {
                        Value::Text(field.to_string())
                    }
                })
                .collect();
            if values.iter().all(Value::is_empty) {
                continue;
            }
            table.push_row(values);
        }

        Ok(Self {
            sheets: vec![Sheet {
                name: SINGLE_SHEET.to_string(),
                table,
            }],
        })
    }

    /// Look up a sheet's table by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .map(|s| &s.table)
    }

    /// Sheet names in source order.
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Trim header cells and reject blank or duplicate column names.
fn header_names(raw: impl Iterator<Item = String>, sheet: &str) -> Result<Vec<String>> {
    let mut columns: Vec<String> = Vec::new();
    for cell in raw {
        let name = cell.trim().to_string();
        if name.is_empty() {
            return Err(TabmetaError::source(format!(
                "sheet '{}' has a blank column name",
                sheet
            )));
        }
        if columns.contains(&name) {
            return Err(TabmetaError::source(format!(
                "sheet '{}' has a duplicate column name '{}'",
                sheet, name
            )));
        }
        columns.push(name);
    }
    Ok(columns)
}

fn delimiter_byte(separator: &str) -> Result<u8> {
    let mut bytes = separator.bytes();
    match (bytes.next(), bytes.next()) {
        (Some(b), None) => Ok(b),
        _ => Err(TabmetaError::config(format!(
            "separator must be a single character, got '{}'",
            separator
        ))),
    }
}

fn convert_cell(data: &Data) -> Value {
    match data {
        Data::Empty => Value::Empty,
        Data::String(s) => {
            if s.is_empty() {
                Value::Empty
            } else {
                Value::Text(s.clone())
            }
        }
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Integer(*i),
        Data::Bool(b) => Value::Bool(*b),
        // No datetime handling in the metadata transport; keep the serial
        // number / ISO text the cell carries.
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(_) => Value::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str, extension: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(&format!(".{}", extension))
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_delimited_single_sheet() {
        let file = write_temp("id,tag\na.txt,one\nb.txt,two\n", "csv");
        let dataset = Dataset::load(file.path(), ",").unwrap();

        assert_eq!(dataset.sheet_names(), vec![SINGLE_SHEET]);
        let table = dataset.get(SINGLE_SHEET).unwrap();
        assert_eq!(table.columns, vec!["id", "tag"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, "tag"), Some(&Value::Text("two".into())));
    }

    #[test]
    fn test_delimited_custom_separator() {
        let file = write_temp("id;tag\na.txt;one\n", "csv");
        let dataset = Dataset::load(file.path(), ";").unwrap();
        let table = dataset.get(SINGLE_SHEET).unwrap();
        assert_eq!(table.columns, vec!["id", "tag"]);
        assert_eq!(table.cell(0, "id"), Some(&Value::Text("a.txt".into())));
    }

    #[test]
    fn test_headers_are_trimmed() {
        let file = write_temp(" id , tag \na.txt,one\n", "csv");
        let dataset = Dataset::load(file.path(), ",").unwrap();
        let table = dataset.get(SINGLE_SHEET).unwrap();
        assert_eq!(table.columns, vec!["id", "tag"]);
    }

    #[test]
    fn test_duplicate_headers_rejected() {
        let file = write_temp("id,id\na,b\n", "csv");
        assert!(Dataset::load(file.path(), ",").is_err());
    }

    #[test]
    fn test_empty_fields_become_empty_values() {
        let file = write_temp("id,tag\na.txt,\n", "csv");
        let dataset = Dataset::load(file.path(), ",").unwrap();
        let table = dataset.get(SINGLE_SHEET).unwrap();
        assert_eq!(table.cell(0, "tag"), Some(&Value::Empty));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp("whatever", "parquet");
        let err = Dataset::load(file.path(), ",").unwrap_err();
        assert!(err.to_string().contains("unsupported file type"));
    }

    #[test]
    fn test_multichar_separator_rejected() {
        let file = write_temp("id,tag\n", "csv");
        assert!(Dataset::load(file.path(), ",,").is_err());
    }
}
