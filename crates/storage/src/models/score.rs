use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ScoreStatus;

/// Result of one start list entry in one round (or jump-off) of a class.
///
/// `rank` and `qualified_for_jumpoff` are owned by the ranking pass and are never
/// taken from a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Score {
    pub score_id: Uuid,
    pub startlist_id: Uuid,
    pub class_id: Uuid,
    pub round_number: i32,
    pub is_jumpoff: bool,
    pub time_taken: Option<Decimal>,
    pub time_faults: Option<Decimal>,
    pub jumping_faults: Option<Decimal>,
    pub total_faults: Option<Decimal>,
    pub points: Option<Decimal>,
    pub final_time: Option<Decimal>,
    #[sqlx(try_from = "String")]
    pub status: ScoreStatus,
    pub qualified_for_jumpoff: bool,
    pub rank: Option<i32>,
    pub scored_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Score {
    pub fn is_completed(&self) -> bool {
        self.status == ScoreStatus::Completed
    }
}
