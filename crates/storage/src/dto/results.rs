use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{Score, ScoreStatus, StartlistEntry};
use crate::rules::ClassRule;
use crate::services::ranking::{Placing, RoundScope, TeamStanding};

#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct ResultsQuery {
    /// Main round, or the round the jump-off follows (defaults to 1)
    pub round: Option<i32>,
    #[serde(default)]
    pub jumpoff: bool,
}

impl ResultsQuery {
    pub fn scope(&self) -> RoundScope {
        RoundScope {
            round_number: self.round.unwrap_or(1),
            is_jumpoff: self.jumpoff,
        }
    }
}

/// One line of a results board.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResultRow {
    pub rank: Option<i32>,
    pub qualified_for_jumpoff: bool,
    pub startlist_id: Uuid,
    pub start_order: i32,
    pub rider_name: String,
    pub horse_name: String,
    pub team_name: Option<String>,
    pub country_code: Option<String>,
    pub status: ScoreStatus,
    pub time_taken: Option<Decimal>,
    pub time_faults: Option<Decimal>,
    pub jumping_faults: Option<Decimal>,
    pub total_faults: Option<Decimal>,
    pub points: Option<Decimal>,
    pub final_time: Option<Decimal>,
}

impl ResultRow {
    pub(crate) fn new(entry: &StartlistEntry, score: &Score, placing: Option<&Placing>) -> Self {
        Self {
            rank: placing.map(|p| p.rank),
            qualified_for_jumpoff: placing.is_some_and(|p| p.qualified_for_jumpoff),
            startlist_id: entry.startlist_id,
            start_order: entry.start_order,
            rider_name: entry.rider_name.clone(),
            horse_name: entry.horse_name.clone(),
            team_name: entry.team_name.clone(),
            country_code: entry.country_code.clone(),
            status: score.status,
            time_taken: score.time_taken,
            time_faults: score.time_faults,
            jumping_faults: score.jumping_faults,
            total_faults: score.total_faults,
            points: score.points,
            final_time: score.final_time,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClassResults {
    pub class_id: Uuid,
    pub class_name: String,
    pub class_rule: ClassRule,
    pub round_number: i32,
    pub is_jumpoff: bool,
    /// Ranked results first, then unranked ones in running order
    pub rows: Vec<ResultRow>,
    /// Only filled for team rules
    pub teams: Vec<TeamStanding>,
}
