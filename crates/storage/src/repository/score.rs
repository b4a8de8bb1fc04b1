use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Score;

const SCORE_COLUMNS: &str = r#"
    score_id, startlist_id, class_id, round_number, is_jumpoff, time_taken, time_faults,
    jumping_faults, total_faults, points, final_time, status, qualified_for_jumpoff,
    rank, scored_at, created_at, updated_at
"#;

pub struct ScoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScoreRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_class(&self, class_id: Uuid) -> Result<Vec<Score>> {
        let scores = sqlx::query_as::<_, Score>(&format!(
            r#"
            SELECT {SCORE_COLUMNS}
            FROM scores
            WHERE class_id = $1
            ORDER BY round_number, is_jumpoff, rank NULLS LAST
            "#
        ))
        .bind(class_id)
        .fetch_all(self.pool)
        .await?;

        Ok(scores)
    }

    pub async fn find_by_id(&self, score_id: Uuid) -> Result<Score> {
        sqlx::query_as::<_, Score>(&format!(
            "SELECT {SCORE_COLUMNS} FROM scores WHERE score_id = $1"
        ))
        .bind(score_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn find_for_entry(
        &self,
        startlist_id: Uuid,
        round_number: i32,
        is_jumpoff: bool,
    ) -> Result<Option<Score>> {
        let score = sqlx::query_as::<_, Score>(&format!(
            r#"
            SELECT {SCORE_COLUMNS}
            FROM scores
            WHERE startlist_id = $1 AND round_number = $2 AND is_jumpoff = $3
            "#
        ))
        .bind(startlist_id)
        .bind(round_number)
        .bind(is_jumpoff)
        .fetch_optional(self.pool)
        .await?;

        Ok(score)
    }

    /// Insert the score, or overwrite the existing row for the same entry, round and
    /// jump-off flag while keeping its id.
    pub async fn upsert(&self, score: &Score) -> Result<Score> {
        sqlx::query_as::<_, Score>(&format!(
            r#"
            INSERT INTO scores (
                score_id, startlist_id, class_id, round_number, is_jumpoff, time_taken,
                time_faults, jumping_faults, total_faults, points, final_time, status,
                qualified_for_jumpoff, rank, scored_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (startlist_id, round_number, is_jumpoff) DO UPDATE SET
                time_taken = EXCLUDED.time_taken,
                time_faults = EXCLUDED.time_faults,
                jumping_faults = EXCLUDED.jumping_faults,
                total_faults = EXCLUDED.total_faults,
                points = EXCLUDED.points,
                final_time = EXCLUDED.final_time,
                status = EXCLUDED.status,
                qualified_for_jumpoff = EXCLUDED.qualified_for_jumpoff,
                rank = EXCLUDED.rank,
                scored_at = EXCLUDED.scored_at,
                updated_at = NOW()
            RETURNING {SCORE_COLUMNS}
            "#
        ))
        .bind(score.score_id)
        .bind(score.startlist_id)
        .bind(score.class_id)
        .bind(score.round_number)
        .bind(score.is_jumpoff)
        .bind(score.time_taken)
        .bind(score.time_faults)
        .bind(score.jumping_faults)
        .bind(score.total_faults)
        .bind(score.points)
        .bind(score.final_time)
        .bind(score.status.as_str())
        .bind(score.qualified_for_jumpoff)
        .bind(score.rank)
        .bind(score.scored_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from_write(e, "Start list entry does not exist"))
    }

    pub async fn update_placing(
        &self,
        score_id: Uuid,
        rank: Option<i32>,
        qualified_for_jumpoff: bool,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE scores
            SET rank = $2, qualified_for_jumpoff = $3, updated_at = NOW()
            WHERE score_id = $1
            "#,
        )
        .bind(score_id)
        .bind(rank)
        .bind(qualified_for_jumpoff)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn delete(&self, score_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM scores WHERE score_id = $1")
            .bind(score_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
