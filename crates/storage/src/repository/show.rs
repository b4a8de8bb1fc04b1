use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{EventStatus, Show};

const SHOW_COLUMNS: &str = r#"
    show_id, name, start_date, end_date, show_type, status, created_at, updated_at
"#;

/// Repository for Show database operations
pub struct ShowRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShowRepository<'a> {
    /// Create a new ShowRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all shows, most recent first
    pub async fn list(&self) -> Result<Vec<Show>> {
        let shows = sqlx::query_as::<_, Show>(&format!(
            "SELECT {SHOW_COLUMNS} FROM shows ORDER BY start_date DESC, created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(shows)
    }

    /// List every show that has not been cancelled
    pub async fn list_live(&self) -> Result<Vec<Show>> {
        let shows = sqlx::query_as::<_, Show>(&format!(
            "SELECT {SHOW_COLUMNS} FROM shows WHERE status <> 'cancelled' ORDER BY start_date"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(shows)
    }

    /// Get a show by ID
    pub async fn find_by_id(&self, show_id: Uuid) -> Result<Show> {
        sqlx::query_as::<_, Show>(&format!(
            "SELECT {SHOW_COLUMNS} FROM shows WHERE show_id = $1"
        ))
        .bind(show_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Create a new show
    pub async fn create(&self, show: &Show) -> Result<Show> {
        sqlx::query_as::<_, Show>(&format!(
            r#"
            INSERT INTO shows (show_id, name, start_date, end_date, show_type, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SHOW_COLUMNS}
            "#
        ))
        .bind(show.show_id)
        .bind(&show.name)
        .bind(show.start_date)
        .bind(show.end_date)
        .bind(show.show_type.as_str())
        .bind(show.status.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from_write(e, "Show already exists"))
    }

    /// Update an existing show
    pub async fn update(&self, show: &Show) -> Result<Show> {
        sqlx::query_as::<_, Show>(&format!(
            r#"
            UPDATE shows
            SET
                name = $2,
                start_date = $3,
                end_date = $4,
                show_type = $5,
                status = $6,
                updated_at = NOW()
            WHERE show_id = $1
            RETURNING {SHOW_COLUMNS}
            "#
        ))
        .bind(show.show_id)
        .bind(&show.name)
        .bind(show.start_date)
        .bind(show.end_date)
        .bind(show.show_type.as_str())
        .bind(show.status.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Set only the lifecycle status of a show
    pub async fn update_status(&self, show_id: Uuid, status: EventStatus) -> Result<()> {
        let result = sqlx::query(
            "UPDATE shows SET status = $2, updated_at = NOW() WHERE show_id = $1",
        )
        .bind(show_id)
        .bind(status.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Delete a show by ID
    pub async fn delete(&self, show_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM shows WHERE show_id = $1")
            .bind(show_id)
            .execute(self.pool)
            .await
            .map_err(|e| StorageError::from_write(e, "Show still has classes"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
