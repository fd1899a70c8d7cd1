//! Interactive configuration wizard for creating config files.

use dialoguer::{Confirm, Input, MultiSelect, Select};
use std::path::Path;
use tabmeta::config::validate_collection_path;
use tabmeta::{Config, Dataset, MatchMode, PathColumn, PathType};

/// Result type for wizard operations.
pub type WizardResult<T> = Result<T, WizardError>;

/// Errors that can occur during wizard execution.
#[derive(Debug)]
pub enum WizardError {
    /// User cancelled the wizard.
    Cancelled,
    /// IO error (file read/write).
    Io(std::io::Error),
    /// The tabular source could not be inspected.
    Source(String),
    /// Validation error.
    Validation(String),
}

impl std::fmt::Display for WizardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "Configuration cancelled"),
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Source(msg) => write!(f, "Source error: {}", msg),
            Self::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for WizardError {}

impl From<std::io::Error> for WizardError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<dialoguer::Error> for WizardError {
    fn from(e: dialoguer::Error) -> Self {
        Self::Io(std::io::Error::other(e.to_string()))
    }
}

/// What the wizard knows about the tabular source, if a file was given.
struct SourceOutline {
    /// (sheet name, column names) per sheet.
    sheets: Vec<(String, Vec<String>)>,
}

/// Run the configuration wizard.
pub fn run_wizard(output: &Path, data: Option<&Path>, force: bool) -> WizardResult<()> {
    println!();
    println!("tabmeta - Configuration Wizard");
    println!("==============================");
    println!();

    if output.exists() && !force && !prompt_overwrite(output)? {
        return Err(WizardError::Cancelled);
    }

    let separator = prompt_separator(data)?;
    let outline = match data {
        Some(path) => Some(inspect_source(path, &separator)?),
        None => None,
    };

    let sheets = prompt_sheets(outline.as_ref())?;
    let columns = available_columns(outline.as_ref(), &sheets);
    let path_column = prompt_path_column(&columns)?;

    // Warn about sheets the chosen identifier column would exclude
    if let Some(ref outline) = outline {
        for (name, cols) in &outline.sheets {
            if sheets.contains(name) && !cols.contains(&path_column.column_name) {
                println!(
                    "Note: sheet '{}' has no '{}' column and will be skipped.",
                    name, path_column.column_name
                );
            }
        }
    }

    let blacklist = prompt_excluded_columns(&columns, &path_column.column_name)?;

    let config = Config {
        sheets,
        separator,
        path_column,
        whitelist: None,
        blacklist,
    };

    if let Err(e) = config.validate() {
        return Err(WizardError::Validation(e.to_string()));
    }

    let yaml = config
        .to_yaml()
        .map_err(|e| WizardError::Validation(e.to_string()))?;
    println!("\nConfiguration:\n\n{}", yaml);

    if !Confirm::new()
        .with_prompt(format!("Save to {}?", output.display()))
        .default(true)
        .interact()?
    {
        return Err(WizardError::Cancelled);
    }

    std::fs::write(output, yaml)?;

    println!("\nConfiguration saved to {}", output.display());
    println!("Run 'tabmeta run' to apply the metadata.");

    Ok(())
}

fn prompt_overwrite(path: &Path) -> WizardResult<bool> {
    println!("File already exists: {}\n", path.display());
    Ok(Confirm::new()
        .with_prompt("Overwrite with a new configuration?")
        .default(false)
        .interact()?)
}

fn prompt_separator(data: Option<&Path>) -> WizardResult<String> {
    // Only plain-text sources are split on a separator
    let is_delimited = data
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "csv" | "tsv"))
        .unwrap_or(false);

    if !is_delimited {
        return Ok(",".to_string());
    }

    Ok(Input::new()
        .with_prompt("Separator for the plain-text source")
        .default(",".to_string())
        .interact_text()?)
}

fn inspect_source(path: &Path, separator: &str) -> WizardResult<SourceOutline> {
    let dataset =
        Dataset::load(path, separator).map_err(|e| WizardError::Source(e.to_string()))?;
    Ok(SourceOutline {
        sheets: dataset
            .sheets
            .into_iter()
            .map(|s| (s.name, s.table.columns))
            .collect(),
    })
}

fn prompt_sheets(outline: Option<&SourceOutline>) -> WizardResult<Vec<String>> {
    let Some(outline) = outline else {
        // No source to inspect: free-text entry
        let input: String = Input::new()
            .with_prompt("Sheets to process (comma-separated)")
            .interact_text()?;
        return Ok(input
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect());
    };

    let names: Vec<&str> = outline.sheets.iter().map(|(n, _)| n.as_str()).collect();
    if names.len() == 1 {
        return Ok(vec![names[0].to_string()]);
    }

    let mut items = vec!["all"];
    items.extend(&names);
    let selection = Select::new()
        .with_prompt("Which sheet would you like to use?")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(if selection == 0 {
        names.iter().map(|n| n.to_string()).collect()
    } else {
        vec![items[selection].to_string()]
    })
}

fn available_columns(outline: Option<&SourceOutline>, sheets: &[String]) -> Vec<String> {
    let Some(outline) = outline else {
        return Vec::new();
    };

    // Union of columns across the selected sheets, in first-seen order
    let mut columns = Vec::new();
    for (name, cols) in &outline.sheets {
        if !sheets.contains(name) {
            continue;
        }
        for col in cols {
            if !columns.contains(col) {
                columns.push(col.clone());
            }
        }
    }
    columns
}

fn prompt_path_column(columns: &[String]) -> WizardResult<PathColumn> {
    let column_name = if columns.is_empty() {
        Input::new()
            .with_prompt("Which column contains the identifier of the target data object?")
            .interact_text()?
    } else {
        let selection = Select::new()
            .with_prompt("Which column contains the identifier of the target data object?")
            .items(columns)
            .interact()?;
        columns[selection].clone()
    };

    let types = &[
        "absolute - the column holds full object paths",
        "relative - the column holds paths below a working collection",
        "part - the column holds (part of) the object name",
    ];
    let path_type = match Select::new()
        .with_prompt(format!("How is the path coded in '{}'?", column_name))
        .items(types)
        .interact()?
    {
        0 => PathType::Absolute,
        1 => PathType::Relative,
        _ => PathType::Part,
    };

    let workdir = if path_type == PathType::Absolute {
        None
    } else {
        let dir: String = Input::new()
            .with_prompt("Absolute path of the collection holding the files (/{zone}/home/{project})")
            .validate_with(|input: &String| {
                validate_collection_path(input).map_err(|e| e.to_string())
            })
            .interact_text()?;
        Some(dir)
    };

    let match_mode = if path_type == PathType::Part {
        let modes = &[
            "exact - identifier equals the object name",
            "prefix - identifier is the start of the object name",
        ];
        match Select::new()
            .with_prompt("How should object names be matched?")
            .items(modes)
            .default(0)
            .interact()?
        {
            0 => MatchMode::Exact,
            _ => MatchMode::Prefix,
        }
    } else {
        MatchMode::default()
    };

    Ok(PathColumn {
        column_name,
        path_type,
        workdir,
        match_mode,
    })
}

fn prompt_excluded_columns(
    columns: &[String],
    path_column: &str,
) -> WizardResult<Option<Vec<String>>> {
    if !Confirm::new()
        .with_prompt("Would you like to exclude any of the columns?")
        .default(false)
        .interact()?
    {
        return Ok(None);
    }

    let excludable: Vec<&String> = columns.iter().filter(|c| *c != path_column).collect();
    if excludable.is_empty() {
        let input: String = Input::new()
            .with_prompt("Columns to exclude (comma-separated)")
            .allow_empty(true)
            .interact_text()?;
        let excluded: Vec<String> = input
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        return Ok(if excluded.is_empty() { None } else { Some(excluded) });
    }

    let picks = MultiSelect::new()
        .with_prompt("Select the columns to exclude")
        .items(&excludable)
        .interact()?;

    if picks.is_empty() {
        return Ok(None);
    }
    Ok(Some(picks.iter().map(|&i| excludable[i].clone()).collect()))
}
