use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// How a database file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// File must already exist
    ReadWrite,
    /// File is created when missing
    ReadWriteCreate,
}

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);

    // One writer for the whole run; a second pooled connection would also
    // see a different database for `sqlite::memory:`
    opt.max_connections(1)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(true)
        .sqlx_logging_level(tracing::log::LevelFilter::Debug);

    Database::connect(opt).await
}

pub fn get_database_url(database_path: &str, mode: OpenMode) -> String {
    let mode = match mode {
        OpenMode::ReadWrite => "rw",
        OpenMode::ReadWriteCreate => "rwc",
    };
    match database_path {
        ":memory:" => "sqlite::memory:".to_string(),
        path => format!("sqlite://{}?mode={}", path, mode),
    }
}
