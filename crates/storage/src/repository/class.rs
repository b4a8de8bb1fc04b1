use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{CompetitionClass, EventStatus};

const CLASS_COLUMNS: &str = r#"
    class_id, show_id, class_name, class_rule, height, price, currency, class_date,
    start_time, time_allowed, time_allowed_round2, optimum_time, max_points,
    number_of_rounds, status, linked_stream_id, created_at, updated_at
"#;

/// Repository for Class database operations
pub struct ClassRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ClassRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List classes, optionally restricted to one show
    pub async fn list(&self, show_id: Option<Uuid>) -> Result<Vec<CompetitionClass>> {
        let mut query = QueryBuilder::new(format!("SELECT {CLASS_COLUMNS} FROM classes WHERE 1=1"));

        if let Some(show_id) = show_id {
            query.push(" AND show_id = ");
            query.push_bind(show_id);
        }

        query.push(" ORDER BY class_date, start_time NULLS FIRST, created_at");

        let classes = query
            .build_query_as::<CompetitionClass>()
            .fetch_all(self.pool)
            .await?;

        Ok(classes)
    }

    pub async fn list_live(&self) -> Result<Vec<CompetitionClass>> {
        let classes = sqlx::query_as::<_, CompetitionClass>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE status <> 'cancelled' ORDER BY class_date"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(classes)
    }

    pub async fn find_by_id(&self, class_id: Uuid) -> Result<CompetitionClass> {
        sqlx::query_as::<_, CompetitionClass>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE class_id = $1"
        ))
        .bind(class_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn create(&self, class: &CompetitionClass) -> Result<CompetitionClass> {
        sqlx::query_as::<_, CompetitionClass>(&format!(
            r#"
            INSERT INTO classes (
                class_id, show_id, class_name, class_rule, height, price, currency,
                class_date, start_time, time_allowed, time_allowed_round2, optimum_time,
                max_points, number_of_rounds, status, linked_stream_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {CLASS_COLUMNS}
            "#
        ))
        .bind(class.class_id)
        .bind(class.show_id)
        .bind(&class.class_name)
        .bind(class.class_rule.as_str())
        .bind(class.height)
        .bind(class.price)
        .bind(&class.currency)
        .bind(class.class_date)
        .bind(class.start_time)
        .bind(class.time_allowed)
        .bind(class.time_allowed_round2)
        .bind(class.optimum_time)
        .bind(class.max_points)
        .bind(class.number_of_rounds)
        .bind(class.status.as_str())
        .bind(class.linked_stream_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from_write(e, "Show does not exist"))
    }

    pub async fn update(&self, class: &CompetitionClass) -> Result<CompetitionClass> {
        sqlx::query_as::<_, CompetitionClass>(&format!(
            r#"
            UPDATE classes
            SET
                show_id = $2,
                class_name = $3,
                class_rule = $4,
                height = $5,
                price = $6,
                currency = $7,
                class_date = $8,
                start_time = $9,
                time_allowed = $10,
                time_allowed_round2 = $11,
                optimum_time = $12,
                max_points = $13,
                number_of_rounds = $14,
                status = $15,
                linked_stream_id = $16,
                updated_at = NOW()
            WHERE class_id = $1
            RETURNING {CLASS_COLUMNS}
            "#
        ))
        .bind(class.class_id)
        .bind(class.show_id)
        .bind(&class.class_name)
        .bind(class.class_rule.as_str())
        .bind(class.height)
        .bind(class.price)
        .bind(&class.currency)
        .bind(class.class_date)
        .bind(class.start_time)
        .bind(class.time_allowed)
        .bind(class.time_allowed_round2)
        .bind(class.optimum_time)
        .bind(class.max_points)
        .bind(class.number_of_rounds)
        .bind(class.status.as_str())
        .bind(class.linked_stream_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StorageError::from_write(e, "Show does not exist"))?
        .ok_or(StorageError::NotFound)
    }

    pub async fn update_status(&self, class_id: Uuid, status: EventStatus) -> Result<()> {
        let result = sqlx::query(
            "UPDATE classes SET status = $2, updated_at = NOW() WHERE class_id = $1",
        )
        .bind(class_id)
        .bind(status.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Delete a class; start list entries and scores go with it
    pub async fn delete(&self, class_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM classes WHERE class_id = $1")
            .bind(class_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
