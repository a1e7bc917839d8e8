use anyhow::Result;
use tracing::{info, warn};

use crate::database::{establish_connection, get_database_url, OpenMode};
use crate::extractor::{extract, ExtractOptions};
use crate::services::raw_material_service::{ImportReport, RawMaterialService};

/// Extracts every source, then replaces the table in one transaction.
///
/// Sources are read completely before the store is opened, so an unreadable
/// file never touches the database. The connection is closed whether or not
/// the load succeeds.
pub async fn run_import(options: &ExtractOptions, database: &str) -> Result<ImportReport> {
    let extraction = extract(options)?;

    let database_url = get_database_url(database, OpenMode::ReadWrite);
    info!("Importing into {}", database);
    let db = establish_connection(&database_url).await?;

    let service = RawMaterialService::new(db);
    let result = service.replace_all(&extraction).await;

    if let Err(err) = service.close().await {
        warn!("Failed to close database: {}", err);
    }

    Ok(result?)
}
