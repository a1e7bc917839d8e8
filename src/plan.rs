//! ## Structure
//! The plan file names the recipe exports to read and the store to replace.
//!
//! ```text
//! Plan
//!   ├── database: String
//!   ├── sources: Vec<String>
//!   └── csv: CSVImportParams
//!       ├── skiprows: Option<usize>   (default 2)
//!       └── separator: Option<char>   (default ';')
//! ```
//!
//! Relative paths are resolved against the directory holding the plan file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{PlanError, PlanResult};
use crate::extractor::ExtractOptions;

pub const DEFAULT_SKIPROWS: usize = 2;
pub const DEFAULT_SEPARATOR: char = ';';

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Plan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub csv: CSVImportParams,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CSVImportParams {
    pub skiprows: Option<usize>,
    pub separator: Option<char>,
}

impl Plan {
    /// Reads a plan file and anchors its relative paths to the file's directory
    pub fn load(path: impl AsRef<Path>) -> PlanResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut plan: Plan = serde_yaml::from_str(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        plan.database = plan.database.map(|db| anchor(base, &db));
        plan.sources = plan.sources.iter().map(|s| anchor(base, s)).collect();
        Ok(plan)
    }

    /// Plan written by `rawmat init`
    pub fn template() -> Self {
        Plan {
            database: Some("sajati_smart_system.db".to_string()),
            sources: vec![
                "PG-Tabel PG.csv".to_string(),
                "Resep Kopi-Resep Coffee.csv".to_string(),
                "Resep Non Kopi-Resep Non Coffee.csv".to_string(),
                "Resep Makanan-Resep Makanan.csv".to_string(),
            ],
            csv: CSVImportParams {
                skiprows: Some(DEFAULT_SKIPROWS),
                separator: Some(DEFAULT_SEPARATOR),
            },
        }
    }

    /// Command line values replace the plan's; repeated sources replace the whole list
    pub fn with_overrides(mut self, database: Option<String>, sources: Vec<String>) -> Self {
        if database.is_some() {
            self.database = database;
        }
        if !sources.is_empty() {
            self.sources = sources;
        }
        self
    }

    pub fn database(&self) -> PlanResult<&str> {
        self.database.as_deref().ok_or(PlanError::NoDatabase)
    }

    pub fn extract_options(&self) -> PlanResult<ExtractOptions> {
        if self.sources.is_empty() {
            return Err(PlanError::NoSources);
        }

        let separator = self.csv.separator.unwrap_or(DEFAULT_SEPARATOR);
        if !separator.is_ascii() {
            return Err(PlanError::InvalidSeparator(separator));
        }

        Ok(ExtractOptions {
            sources: self.sources.iter().map(PathBuf::from).collect(),
            skiprows: self.csv.skiprows.unwrap_or(DEFAULT_SKIPROWS),
            separator: separator as u8,
        })
    }
}

fn anchor(base: &Path, value: &str) -> String {
    let path = Path::new(value);
    if value == ":memory:" || path.is_absolute() || base.as_os_str().is_empty() {
        value.to_string()
    } else {
        base.join(path).to_string_lossy().into_owned()
    }
}
