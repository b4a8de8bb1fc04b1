use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{EventStatus, ShowType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Show {
    pub show_id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub show_type: ShowType,
    #[sqlx(try_from = "String")]
    pub status: EventStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
