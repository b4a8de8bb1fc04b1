use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StartlistEntry {
    pub startlist_id: Uuid,
    pub class_id: Uuid,
    pub rider_name: String,
    /// Identifier of the rider in the external rider directory
    pub rider_external_id: Option<String>,
    pub horse_name: String,
    pub team_name: Option<String>,
    pub is_handicap: bool,
    pub country_code: Option<String>,
    pub start_order: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
