use crate::modules::records::domain::{NormalizedRow, PersistedRecord};
use crate::schema::imported_rows;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

// For reading from database
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = imported_rows)]
pub struct ImportedRowModel {
    pub id: i64,
    pub external_id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// For inserting validated rows
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = imported_rows)]
pub struct NewImportedRow<'a> {
    pub external_id: i64,
    pub name: &'a str,
    pub date: NaiveDate,
}

impl<'a> From<&'a NormalizedRow> for NewImportedRow<'a> {
    fn from(row: &'a NormalizedRow) -> Self {
        Self {
            external_id: row.external_id,
            name: &row.name,
            date: row.date,
        }
    }
}

impl From<ImportedRowModel> for PersistedRecord {
    fn from(model: ImportedRowModel) -> Self {
        Self {
            id: model.id,
            external_id: model.external_id,
            name: model.name,
            date: model.date,
            created_at: model.created_at,
        }
    }
}
