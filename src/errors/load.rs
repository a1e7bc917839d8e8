use thiserror::Error;

/// Errors raised while replacing the raw materials table
#[derive(Error, Debug)]
pub enum LoadError {
    /// Target table is absent; schema is created by `db init`, never by an import
    #[error("Table '{0}' does not exist (run `rawmat db init` first)")]
    MissingTable(String),

    /// Store rejected a statement; the transaction has been rolled back
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl LoadError {
    pub fn is_schema_error(&self) -> bool {
        matches!(self, LoadError::MissingTable(_))
    }
}
