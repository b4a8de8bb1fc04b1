use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request payload for adding a rider and horse to a class start list
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateStartlistEntryRequest {
    #[validate(length(min = 1, max = 255))]
    pub rider_name: String,

    /// Rider id in the external rider directory, used to look up the country
    #[validate(length(min = 1, max = 64))]
    pub rider_external_id: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub horse_name: String,

    #[validate(length(min = 1, max = 255))]
    pub team_name: Option<String>,

    #[serde(default)]
    pub is_handicap: bool,

    #[validate(length(min = 2, max = 3, message = "Country code must be 2 or 3 letters"))]
    pub country_code: Option<String>,

    #[validate(range(min = 1, message = "start_order must be >= 1"))]
    pub start_order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStartlistEntryRequest {
    #[validate(length(min = 1, max = 255))]
    pub rider_name: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub rider_external_id: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub horse_name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub team_name: Option<String>,

    pub is_handicap: Option<bool>,

    #[validate(length(min = 2, max = 3))]
    pub country_code: Option<String>,

    #[validate(range(min = 1))]
    pub start_order: Option<i32>,
}
