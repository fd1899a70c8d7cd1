//! Configuration validation.

use super::{Config, PathType};
use crate::error::{Result, TabmetaError};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.sheets.is_empty() {
        return Err(TabmetaError::Config(
            "sheets must list at least one sheet".into(),
        ));
    }

    if config.path_column.column_name.is_empty() {
        return Err(TabmetaError::Config(
            "path_column.column_name is required".into(),
        ));
    }

    // Whitelist and blacklist are mutually exclusive
    if config.whitelist.is_some() && config.blacklist.is_some() {
        return Err(TabmetaError::Config(
            "whitelist and blacklist are mutually exclusive".into(),
        ));
    }

    // Workdir is required for relative and part resolution
    match (config.path_column.path_type, &config.path_column.workdir) {
        (PathType::Absolute, _) => {}
        (_, Some(_)) => {}
        (path_type, None) => {
            return Err(TabmetaError::Config(format!(
                "path_column.workdir is required when path_type is {:?}",
                path_type
            )));
        }
    }

    if let Some(ref workdir) = config.path_column.workdir {
        validate_collection_path(workdir)?;
    }

    Ok(())
}

/// Check that a collection path has the `/{zone}/home/{project}[/...]` shape.
///
/// Also used by the setup wizard to validate workdir input as it is typed.
pub fn validate_collection_path(path: &str) -> Result<()> {
    let invalid = || {
        TabmetaError::Config(format!(
            "workdir '{}' must be an absolute collection path of the form /{{zone}}/home/{{project}}",
            path
        ))
    };

    let rest = path.strip_prefix('/').ok_or_else(invalid)?;
    let segments: Vec<&str> = rest.split('/').collect();

    if segments.len() < 3 || segments.iter().any(|s| s.is_empty()) {
        return Err(invalid());
    }
    if segments[1] != "home" {
        return Err(invalid());
    }

    Ok(())
}
