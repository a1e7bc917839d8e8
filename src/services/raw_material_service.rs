use sea_orm::{
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    TransactionTrait,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::database::entities::raw_materials;
use crate::database::schema::table_exists;
use crate::errors::{LoadError, LoadResult};
use crate::extractor::{Extraction, RawMaterial};

pub const CODE_PREFIX: &str = "RM.";

/// `RM.` followed by the 1-based position, zero-padded to four digits
pub fn material_code(position: usize) -> String {
    format!("{}{:04}", CODE_PREFIX, position)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub deleted: u64,
    pub inserted: usize,
    pub first_code: Option<String>,
    pub last_code: Option<String>,
}

pub struct RawMaterialService {
    db: DatabaseConnection,
}

impl RawMaterialService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Replaces the whole table with `extraction`, committing only if every row lands
    pub async fn replace_all(&self, extraction: &Extraction) -> LoadResult<ImportReport> {
        if !table_exists(&self.db, raw_materials::TABLE_NAME).await? {
            return Err(LoadError::MissingTable(raw_materials::TABLE_NAME.to_string()));
        }

        let materials = extraction.sorted();
        let txn = self.db.begin().await?;

        match Self::rewrite(&txn, &materials).await {
            Ok(report) => {
                txn.commit().await?;
                info!("Total raw materials imported: {}", report.inserted);
                Ok(report)
            }
            Err(err) => {
                error!("Error: {}", err);
                if let Err(rollback_err) = txn.rollback().await {
                    warn!("Rollback failed: {}", rollback_err);
                } else {
                    info!("Rolled back, '{}' left unchanged", raw_materials::TABLE_NAME);
                }
                Err(err)
            }
        }
    }

    async fn rewrite(
        txn: &DatabaseTransaction,
        materials: &[&RawMaterial],
    ) -> LoadResult<ImportReport> {
        let deleted = raw_materials::Entity::delete_many()
            .exec(txn)
            .await?
            .rows_affected;

        let mut report = ImportReport {
            deleted,
            ..Default::default()
        };

        for (index, material) in materials.iter().enumerate() {
            let code = material_code(index + 1);
            let row = raw_materials::ActiveModel::new(
                code.clone(),
                material.name.clone(),
                material.unit.clone(),
            );
            raw_materials::Entity::insert(row).exec(txn).await?;
            info!("Inserted: {} - {} ({})", code, material.name, material.unit);

            if report.first_code.is_none() {
                report.first_code = Some(code.clone());
            }
            report.last_code = Some(code);
            report.inserted += 1;
        }

        Ok(report)
    }

    pub async fn list(&self) -> LoadResult<Vec<raw_materials::Model>> {
        let rows = raw_materials::Entity::find()
            .order_by_asc(raw_materials::Column::Code)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> LoadResult<u64> {
        Ok(raw_materials::Entity::find().count(&self.db).await?)
    }

    pub async fn close(self) -> Result<(), DbErr> {
        self.db.close().await
    }
}
