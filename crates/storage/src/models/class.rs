use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::EventStatus;
use crate::rules::ClassRule;

/// A single judged competition within a show.
///
/// Times (`time_allowed`, `time_allowed_round2`, `optimum_time`) are in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CompetitionClass {
    pub class_id: Uuid,
    pub show_id: Uuid,
    pub class_name: String,
    #[sqlx(try_from = "String")]
    pub class_rule: ClassRule,
    pub height: Option<Decimal>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub class_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub time_allowed: Option<Decimal>,
    pub time_allowed_round2: Option<Decimal>,
    pub optimum_time: Option<Decimal>,
    pub max_points: Option<Decimal>,
    pub number_of_rounds: i32,
    #[sqlx(try_from = "String")]
    pub status: EventStatus,
    pub linked_stream_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
