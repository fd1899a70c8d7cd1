//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;
pub use validation::validate_collection_path;

use crate::error::Result;
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Serialize the configuration as a YAML document.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_full_document() {
        let yaml = r#"
sheets: [sheet1, sheet2]
separator: ";"
path_column:
  column_name: fileid
  path_type: part
  workdir: /zoneA/home/projX
  match_mode: prefix
blacklist: [internal_notes]
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.sheets, vec!["sheet1", "sheet2"]);
        assert_eq!(config.separator, ";");
        assert_eq!(config.path_column.path_type, PathType::Part);
        assert_eq!(config.path_column.match_mode, MatchMode::Prefix);
        assert_eq!(config.blacklist.as_deref(), Some(&["internal_notes".to_string()][..]));
    }

    #[test]
    fn test_from_yaml_defaults() {
        let yaml = r#"
sheets: [single_sheet]
path_column:
  column_name: id
  path_type: absolute
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.separator, ",");
        assert_eq!(config.path_column.match_mode, MatchMode::Exact);
        assert!(config.path_column.workdir.is_none());
        assert_eq!(config.column_selection(), ColumnSelection::All);
    }

    #[test]
    fn test_from_yaml_unknown_path_type() {
        let yaml = r#"
sheets: [single_sheet]
path_column:
  column_name: id
  path_type: sideways
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = r#"
sheets: [sheet1]
path_column:
  column_name: fileid
  path_type: relative
  workdir: /zoneA/home/projX
whitelist: [md1, md2]
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let reparsed = Config::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(reparsed.sheets, config.sheets);
        assert_eq!(reparsed.whitelist, config.whitelist);
        assert_eq!(reparsed.path_column.workdir, config.path_column.workdir);
    }
}
