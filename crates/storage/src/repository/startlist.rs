use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::StartlistEntry;

const ENTRY_COLUMNS: &str = r#"
    startlist_id, class_id, rider_name, rider_external_id, horse_name, team_name,
    is_handicap, country_code, start_order, created_at, updated_at
"#;

pub struct StartlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StartlistRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Entries of a class in running order
    pub async fn list_by_class(&self, class_id: Uuid) -> Result<Vec<StartlistEntry>> {
        let entries = sqlx::query_as::<_, StartlistEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM startlist_entries WHERE class_id = $1 ORDER BY start_order"
        ))
        .bind(class_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn find_by_id(&self, startlist_id: Uuid) -> Result<StartlistEntry> {
        sqlx::query_as::<_, StartlistEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM startlist_entries WHERE startlist_id = $1"
        ))
        .bind(startlist_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, entry: &StartlistEntry) -> Result<StartlistEntry> {
        sqlx::query_as::<_, StartlistEntry>(&format!(
            r#"
            INSERT INTO startlist_entries (
                startlist_id, class_id, rider_name, rider_external_id, horse_name,
                team_name, is_handicap, country_code, start_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(entry.startlist_id)
        .bind(entry.class_id)
        .bind(&entry.rider_name)
        .bind(&entry.rider_external_id)
        .bind(&entry.horse_name)
        .bind(&entry.team_name)
        .bind(entry.is_handicap)
        .bind(&entry.country_code)
        .bind(entry.start_order)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            StorageError::from_write(e, "Start order already taken or class does not exist")
        })
    }

    pub async fn update(&self, entry: &StartlistEntry) -> Result<StartlistEntry> {
        sqlx::query_as::<_, StartlistEntry>(&format!(
            r#"
            UPDATE startlist_entries
            SET
                rider_name = $2,
                rider_external_id = $3,
                horse_name = $4,
                team_name = $5,
                is_handicap = $6,
                country_code = $7,
                start_order = $8,
                updated_at = NOW()
            WHERE startlist_id = $1
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(entry.startlist_id)
        .bind(&entry.rider_name)
        .bind(&entry.rider_external_id)
        .bind(&entry.horse_name)
        .bind(&entry.team_name)
        .bind(entry.is_handicap)
        .bind(&entry.country_code)
        .bind(entry.start_order)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StorageError::from_write(e, "Start order already taken"))?
        .ok_or(StorageError::NotFound)
    }

    pub async fn delete(&self, startlist_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM startlist_entries WHERE startlist_id = $1")
            .bind(startlist_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
