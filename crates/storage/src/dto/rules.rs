use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::rules::{
    ClassParameter, ClassRule, RoundPlan, RuleProfile, ScoringBasis, TimeDecider, TimeMode,
};

/// Catalog entry as exposed over the API and printed by the CLI
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RuleDescription {
    pub rule: ClassRule,
    pub rounds: RoundPlan,
    pub main_rounds: i32,
    pub allows_jumpoff: bool,
    pub basis: ScoringBasis,
    pub time_mode: TimeMode,
    pub time_decider: TimeDecider,
    pub cumulative_rounds: bool,
    pub team_aggregate: bool,
    pub handicap_allowed: bool,
    pub phase_two_fault_ceiling: Option<Decimal>,
    pub required_parameters: Vec<ClassParameter>,
}

impl From<RuleProfile> for RuleDescription {
    fn from(profile: RuleProfile) -> Self {
        Self {
            rule: profile.rule,
            rounds: profile.rounds,
            main_rounds: profile.rounds.main_rounds(),
            allows_jumpoff: profile.rounds.allows_jumpoff(),
            basis: profile.basis,
            time_mode: profile.time_mode,
            time_decider: profile.time_decider,
            cumulative_rounds: profile.cumulative_rounds,
            team_aggregate: profile.team_aggregate,
            handicap_allowed: profile.handicap_allowed,
            phase_two_fault_ceiling: profile.phase_two_fault_ceiling,
            required_parameters: profile.required_parameters.to_vec(),
        }
    }
}

pub fn describe_catalog() -> Vec<RuleDescription> {
    ClassRule::ALL
        .iter()
        .map(|rule| RuleDescription::from(rule.profile()))
        .collect()
}
