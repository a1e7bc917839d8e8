//! Schema bootstrap for fresh databases
//!
//! Imports never create or alter tables. `rawmat db init` and the tests use
//! these helpers to lay down `raw_materials` from the entity definition.

use sea_orm::{ConnectionTrait, DbErr, Schema, Statement};
use tracing::info;

use super::entities::raw_materials;

pub async fn create_raw_materials_table<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(raw_materials::Entity);
    stmt.if_not_exists();

    db.execute(backend.build(&stmt)).await?;
    info!("Table '{}' ready", raw_materials::TABLE_NAME);
    Ok(())
}

pub async fn table_exists<C: ConnectionTrait>(db: &C, table: &str) -> Result<bool, DbErr> {
    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
        [table.into()],
    );
    Ok(db.query_one(stmt).await?.is_some())
}
