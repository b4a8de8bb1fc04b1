use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::Score;
use crate::services::ranking::Placing;

/// Judges' values for one round of one start list entry.
///
/// Values the rule needs but which are missing leave the score `pending`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitScoreRequest {
    pub startlist_id: Option<Uuid>,

    pub class_id: Option<Uuid>,

    #[validate(range(min = 1, message = "round_number must be >= 1"))]
    #[serde(default = "default_round")]
    pub round_number: i32,

    #[serde(default)]
    pub is_jumpoff: bool,

    /// Seconds
    pub time_taken: Option<Decimal>,

    pub jumping_faults: Option<Decimal>,

    pub points: Option<Decimal>,
}

fn default_round() -> i32 {
    1
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct ScoreFilter {
    pub round: Option<i32>,
    pub jumpoff: Option<bool>,
}

impl ScoreFilter {
    pub fn matches(&self, score: &Score) -> bool {
        self.round.is_none_or(|r| score.round_number == r)
            && self.jumpoff.is_none_or(|j| score.is_jumpoff == j)
    }
}

/// The stored score together with the placings of its class after re-ranking.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmitScoreResponse {
    pub score: Score,
    pub placings: Vec<Placing>,
}
