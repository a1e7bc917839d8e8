//! Plan file errors

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    /// Plan file could not be read or written
    #[error("Plan file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Plan file is not valid YAML for a plan
    #[error("Invalid plan file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// No database given in the plan or on the command line
    #[error("No database configured")]
    NoDatabase,

    /// No source files given in the plan or on the command line
    #[error("No source files configured")]
    NoSources,

    /// Separator must be a single ASCII character
    #[error("Invalid CSV separator '{0}': must be a single ASCII character")]
    InvalidSeparator(char),
}
