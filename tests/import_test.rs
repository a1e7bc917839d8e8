//! End-to-end import tests
//!
//! Each test gets its own SQLite file and CSV fixtures in a temp directory.

use anyhow::Result;
use rawmat::database::entities::raw_materials;
use rawmat::database::schema::{create_raw_materials_table, table_exists};
use rawmat::database::{establish_connection, get_database_url, OpenMode};
use rawmat::errors::{ExtractError, LoadError};
use rawmat::extractor::ExtractOptions;
use rawmat::services::{run_import, RawMaterialService};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder};
use std::path::PathBuf;
use tempfile::TempDir;

const HEADER: &str = "Resep;;;\nNo;Bahan Baku;Jumlah;Satuan\n";

struct Fixture {
    dir: TempDir,
    db: DatabaseConnection,
}

impl Fixture {
    async fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let database = dir.path().join("pos.db");
        let url = get_database_url(&database.to_string_lossy(), OpenMode::ReadWriteCreate);
        let db = establish_connection(&url).await?;
        create_raw_materials_table(&db).await?;
        Ok(Self { dir, db })
    }

    fn database(&self) -> String {
        self.dir.path().join("pos.db").to_string_lossy().into_owned()
    }

    fn csv(&self, name: &str, rows: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        std::fs::write(&path, format!("{HEADER}{rows}"))?;
        Ok(path)
    }

    async fn rows(&self) -> Result<Vec<(String, String, String)>> {
        let rows = raw_materials::Entity::find()
            .order_by_asc(raw_materials::Column::Code)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|r| (r.code, r.name, r.unit)).collect())
    }

    async fn seed(&self, code: &str, name: &str, unit: &str) -> Result<()> {
        let row = raw_materials::ActiveModel::new(code.into(), name.into(), unit.into());
        raw_materials::Entity::insert(row).exec(&self.db).await?;
        Ok(())
    }
}

fn row(code: &str, name: &str, unit: &str) -> (String, String, String) {
    (code.to_string(), name.to_string(), unit.to_string())
}

#[tokio::test]
async fn test_codes_follow_name_order() -> Result<()> {
    let fx = Fixture::new().await?;
    let pg = fx.csv("pg.csv", ";Tepung;250;Gram\n;Gula;2;Kg\n;;\n;Telur;;Butir\n")?;
    let coffee = fx.csv("kopi.csv", ";Kopi;18;\n;Gula;10;Gram\n;Air;;ml\n")?;

    let report = run_import(&ExtractOptions::new(vec![pg, coffee]), &fx.database()).await?;

    assert_eq!(report.inserted, 5);
    assert_eq!(report.first_code.as_deref(), Some("RM.0001"));
    assert_eq!(report.last_code.as_deref(), Some("RM.0005"));
    assert_eq!(
        fx.rows().await?,
        vec![
            row("RM.0001", "Air", "ml"),
            row("RM.0002", "Gula", "Kg"),
            row("RM.0003", "Kopi", "Gram"),
            row("RM.0004", "Telur", "Butir"),
            row("RM.0005", "Tepung", "Gram"),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_import_replaces_previous_rows() -> Result<()> {
    let fx = Fixture::new().await?;
    fx.seed("RM.0001", "Susu Lama", "ml").await?;
    fx.seed("RM.0002", "Coklat", "Gram").await?;
    let source = fx.csv("menu.csv", ";Coklat;30;Gram\n")?;

    let report = run_import(&ExtractOptions::new(vec![source]), &fx.database()).await?;

    assert_eq!(report.deleted, 2);
    assert_eq!(fx.rows().await?, vec![row("RM.0001", "Coklat", "Gram")]);
    Ok(())
}

#[tokio::test]
async fn test_rerun_is_idempotent() -> Result<()> {
    let fx = Fixture::new().await?;
    let source = fx.csv("menu.csv", ";Matcha;5;Gram\n;Susu;150;ml\n;Es Batu;;\n")?;
    let options = ExtractOptions::new(vec![source]);

    run_import(&options, &fx.database()).await?;
    let first = fx.rows().await?;
    let report = run_import(&options, &fx.database()).await?;
    let second = fx.rows().await?;

    assert_eq!(report.deleted, 3);
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_failed_insert_rolls_back_everything() -> Result<()> {
    let fx = Fixture::new().await?;
    fx.seed("RM.0001", "Keju", "Gram").await?;
    fx.seed("RM.0002", "Mentega", "Gram").await?;
    let before = fx.rows().await?;

    fx.db
        .execute_unprepared(
            "CREATE TRIGGER reject_sugar BEFORE INSERT ON raw_materials \
             WHEN NEW.name = 'Gula' BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .await?;
    let source = fx.csv("menu.csv", ";Air;1;ml\n;Gula;1;Kg\n;Susu;1;ml\n")?;

    let err = run_import(&ExtractOptions::new(vec![source]), &fx.database())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LoadError>(),
        Some(LoadError::Database(_))
    ));
    assert_eq!(fx.rows().await?, before);
    Ok(())
}

#[tokio::test]
async fn test_missing_source_leaves_store_untouched() -> Result<()> {
    let fx = Fixture::new().await?;
    fx.seed("RM.0001", "Keju", "Gram").await?;
    let present = fx.csv("menu.csv", ";Air;1;ml\n")?;
    let missing = fx.dir.path().join("hilang.csv");

    let err = run_import(&ExtractOptions::new(vec![present, missing]), &fx.database())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ExtractError>(),
        Some(ExtractError::FileNotFound(_))
    ));
    assert_eq!(fx.rows().await?, vec![row("RM.0001", "Keju", "Gram")]);
    Ok(())
}

#[tokio::test]
async fn test_sources_without_materials_empty_the_table() -> Result<()> {
    let fx = Fixture::new().await?;
    fx.seed("RM.0001", "Keju", "Gram").await?;
    let source = fx.csv("kosong.csv", ";;\n1;  ;2;Kg\n")?;

    let report = run_import(&ExtractOptions::new(vec![source]), &fx.database()).await?;

    assert_eq!(report.inserted, 0);
    assert_eq!(report.first_code, None);
    assert!(fx.rows().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_table_is_reported() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let database = dir.path().join("empty.db");
    let url = get_database_url(&database.to_string_lossy(), OpenMode::ReadWriteCreate);
    let db = establish_connection(&url).await?;
    assert!(!table_exists(&db, raw_materials::TABLE_NAME).await?);

    let service = RawMaterialService::new(db);
    let err = service
        .replace_all(&Default::default())
        .await
        .unwrap_err();
    service.close().await?;

    assert!(err.is_schema_error());
    Ok(())
}

#[tokio::test]
async fn test_missing_database_file_is_an_error() -> Result<()> {
    let fx = Fixture::new().await?;
    let source = fx.csv("menu.csv", ";Air;1;ml\n")?;
    let database = fx.dir.path().join("tidak-ada.db");

    let result = run_import(
        &ExtractOptions::new(vec![source]),
        &database.to_string_lossy(),
    )
    .await;

    assert!(result.is_err());
    assert!(!database.exists());
    Ok(())
}

#[tokio::test]
async fn test_list_and_count() -> Result<()> {
    let fx = Fixture::new().await?;
    let source = fx.csv("menu.csv", ";Vanila;1;ml\n;Aren;1;Gram\n")?;
    run_import(&ExtractOptions::new(vec![source]), &fx.database()).await?;

    let url = get_database_url(&fx.database(), OpenMode::ReadWrite);
    let service = RawMaterialService::new(establish_connection(&url).await?);
    let listed = service.list().await?;
    let count = service.count().await?;
    service.close().await?;

    assert_eq!(count, 2);
    assert_eq!(listed[0].name, "Aren");
    assert_eq!(listed[0].created_at, listed[0].updated_at);
    assert_eq!(listed[1].code, "RM.0002");
    Ok(())
}
