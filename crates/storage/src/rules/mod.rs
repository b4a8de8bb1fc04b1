//! Catalog of the class rule types and the scoring formula each one applies.
//!
//! Everything rule-specific lives here: the scoring engine and the ranking pass only
//! consult [`ClassRule::profile`] and [`ClassRule::score`].

mod catalog;
mod formulas;

pub use catalog::{
    ClassParameter, ClassRule, RoundPlan, RuleProfile, ScoringBasis, TimeDecider, TimeMode,
};
pub use formulas::{
    RoundInput, ScoreComputation, ScoreContext, ScoreOutcome, TIME_FAULTS_PER_SECOND,
    time_penalty,
};
