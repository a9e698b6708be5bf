//! Build settings
//!
//! The command line tool reads its settings from a JSON file:
//!
//! ```json
//! {
//!   "workingFolder": "C:\\Build\\Working\\",
//!   "commentFiles": ["C:\\Build\\Working\\Demo.xml"],
//!   "validNamespaces": ["Demo", "Demo.Tools"],
//!   "forInheritedDocs": false,
//!   "logLevel": "debug"
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::docs::error::{DocsError, DocsResult, IoContext};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSettings {
    /// Folder the build configuration is generated into
    pub working_folder: String,
    /// Comments files in collection order; the first one receives fabricated members
    pub comment_files: Vec<PathBuf>,
    #[serde(default)]
    pub valid_namespaces: HashSet<String>,
    #[serde(default)]
    pub for_inherited_docs: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Overrides the default log file location
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl BuildSettings {
    /// Read settings from a JSON file
    pub fn load(path: &Path) -> DocsResult<Self> {
        let content = fs::read_to_string(path).with_path_context(path)?;
        Self::from_json(path, &content)
    }

    fn from_json(path: &Path, content: &str) -> DocsResult<Self> {
        let settings: BuildSettings =
            serde_json::from_str(content).map_err(|e| DocsError::Settings {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if settings.comment_files.is_empty() {
            return Err(DocsError::Settings {
                path: path.to_path_buf(),
                message: "commentFiles must list at least one file".to_string(),
            });
        }

        Ok(settings)
    }

    /// The configured log level, `Info` if it is not recognized
    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "workingFolder": "/build/work/", "commentFiles": ["/build/work/Demo.xml"] }"#,
        )
        .unwrap();

        let settings = BuildSettings::load(&path).unwrap();
        assert_eq!(settings.working_folder, "/build/work/");
        assert_eq!(settings.comment_files, vec![PathBuf::from("/build/work/Demo.xml")]);
        assert!(settings.valid_namespaces.is_empty());
        assert!(!settings.for_inherited_docs);
        assert_eq!(settings.log_level(), LevelFilter::Info);
        assert!(settings.log_file.is_none());
    }

    #[test]
    fn test_full_settings() {
        let settings = BuildSettings::from_json(
            Path::new("settings.json"),
            r#"{
                "workingFolder": "C:\\work\\",
                "commentFiles": ["a.xml", "b.xml"],
                "validNamespaces": ["Demo", "Demo.Tools"],
                "forInheritedDocs": true,
                "logLevel": "Debug",
                "logFile": "build.log"
            }"#,
        )
        .unwrap();

        assert_eq!(settings.comment_files.len(), 2);
        assert!(settings.valid_namespaces.contains("Demo.Tools"));
        assert!(settings.for_inherited_docs);
        assert_eq!(settings.log_level(), LevelFilter::Debug);
        assert_eq!(settings.log_file, Some(PathBuf::from("build.log")));
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let settings = BuildSettings::from_json(
            Path::new("settings.json"),
            r#"{ "workingFolder": "", "commentFiles": ["a.xml"], "logLevel": "chatty" }"#,
        )
        .unwrap();
        assert_eq!(settings.log_level(), LevelFilter::Info);
    }

    #[test]
    fn test_invalid_settings() {
        let missing_files = BuildSettings::from_json(
            Path::new("settings.json"),
            r#"{ "workingFolder": "", "commentFiles": [] }"#,
        );
        assert!(matches!(missing_files, Err(DocsError::Settings { .. })));

        let not_json = BuildSettings::from_json(Path::new("settings.json"), "workingFolder=");
        assert!(matches!(not_json, Err(DocsError::Settings { .. })));
    }
}
