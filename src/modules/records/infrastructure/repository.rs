/// Diesel-based implementation of RecordRepository
use crate::modules::records::domain::{NormalizedRow, PersistedRecord, RecordRepository};
use crate::modules::records::infrastructure::models::{ImportedRowModel, NewImportedRow};
use crate::schema::imported_rows;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::database::{DbConnection, DbPool};
use async_trait::async_trait;
use diesel::prelude::*;

pub struct RecordRepositoryImpl {
    pool: DbPool,
}

impl RecordRepositoryImpl {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn get_conn(&self) -> AppResult<DbConnection> {
        self.pool
            .get()
            .map_err(|e| AppError::DatabaseError(format!("Failed to get connection: {}", e)))
    }
}

#[async_trait]
impl RecordRepository for RecordRepositoryImpl {
    async fn exists(&self, external_id: i64) -> AppResult<bool> {
        let mut conn = self.get_conn()?;

        let found = diesel::select(diesel::dsl::exists(
            imported_rows::table.filter(imported_rows::external_id.eq(external_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(found)
    }

    async fn insert(&self, row: &NormalizedRow) -> AppResult<PersistedRecord> {
        let mut conn = self.get_conn()?;

        // Unique violations surface as AppError::Duplicate through the From impl
        let inserted: ImportedRowModel = diesel::insert_into(imported_rows::table)
            .values(NewImportedRow::from(row))
            .returning(ImportedRowModel::as_returning())
            .get_result(&mut conn)?;

        Ok(inserted.into())
    }

    async fn find_all(&self) -> AppResult<Vec<PersistedRecord>> {
        let mut conn = self.get_conn()?;

        let rows: Vec<ImportedRowModel> = imported_rows::table
            .order((imported_rows::date.asc(), imported_rows::id.asc()))
            .select(ImportedRowModel::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(PersistedRecord::from).collect())
    }
}
