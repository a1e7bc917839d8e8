//! Error types for rawmat
//!
//! Each stage of an import has its own error enum, so callers can tell a
//! bad source file apart from a store failure.
//!
//! # Error Categories
//!
//! - **ExtractError**: reading and decoding the recipe CSV files
//! - **LoadError**: replacing the `raw_materials` table
//! - **PlanError**: reading and resolving the YAML plan file
//!
//! # Examples
//!
//! ```rust
//! use rawmat::errors::{ExtractError, LoadError};
//!
//! let err = ExtractError::FileNotFound("recipes.csv".into());
//! assert!(err.to_string().contains("recipes.csv"));
//!
//! let err = LoadError::MissingTable("raw_materials".to_string());
//! assert!(err.is_schema_error());
//! ```

pub mod extract;
pub mod load;
pub mod plan;

pub use extract::ExtractError;
pub use load::LoadError;
pub use plan::PlanError;

/// Result type alias for extraction
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Result type alias for table loading
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type alias for plan handling
pub type PlanResult<T> = Result<T, PlanError>;
