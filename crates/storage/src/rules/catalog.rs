use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::UnknownVariant;
use crate::models::CompetitionClass;

/// The jumping competition rule a class is run under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClassRule {
    OneRoundAgainstClock,
    OneRoundNotAgainstClock,
    OptimumTime,
    SpecialTwoPhases,
    TwoPhases,
    OneRoundWithJumpoff,
    TwoRoundsWithTiebreaker,
    TwoRoundsTeamWithTiebreaker,
    Accumulator,
    SpeedAndHandiness,
    SixBars,
}

/// How many rounds a rule runs and whether ties for first go to a jump-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoundPlan {
    Single,
    Double,
    SingleWithJumpoff,
    DoubleWithJumpoff,
}

impl RoundPlan {
    pub fn main_rounds(&self) -> i32 {
        match self {
            Self::Single | Self::SingleWithJumpoff => 1,
            Self::Double | Self::DoubleWithJumpoff => 2,
        }
    }

    pub fn allows_jumpoff(&self) -> bool {
        matches!(self, Self::SingleWithJumpoff | Self::DoubleWithJumpoff)
    }
}

/// Whether results are counted in faults (lower wins) or points (higher wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScoringBasis {
    Faults,
    Points,
}

impl ScoringBasis {
    pub fn higher_is_better(&self) -> bool {
        matches!(self, Self::Points)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeMode {
    AgainstClock,
    Optimum,
    TwoPhase,
    NotAgainstClock,
}

/// When the clock separates entries that are level on faults or points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeDecider {
    Always,
    JumpoffOnly,
    Never,
}

impl TimeDecider {
    pub fn applies(&self, is_jumpoff: bool) -> bool {
        match self {
            Self::Always => true,
            Self::JumpoffOnly => is_jumpoff,
            Self::Never => false,
        }
    }
}

/// Class fields a rule needs before any score can be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClassParameter {
    TimeAllowed,
    TimeAllowedRound2,
    OptimumTime,
    MaxPoints,
}

impl ClassParameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TimeAllowed => "time_allowed",
            Self::TimeAllowedRound2 => "time_allowed_round2",
            Self::OptimumTime => "optimum_time",
            Self::MaxPoints => "max_points",
        }
    }

    fn is_set(&self, class: &CompetitionClass) -> bool {
        match self {
            Self::TimeAllowed => class.time_allowed.is_some(),
            Self::TimeAllowedRound2 => class.time_allowed_round2.is_some(),
            Self::OptimumTime => class.optimum_time.is_some(),
            Self::MaxPoints => class.max_points.is_some(),
        }
    }
}

/// Static description of a rule: rounds, direction, time handling, team scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleProfile {
    pub rule: ClassRule,
    pub rounds: RoundPlan,
    pub basis: ScoringBasis,
    pub time_mode: TimeMode,
    pub time_decider: TimeDecider,
    /// Later main rounds are ranked on faults accumulated since round 1
    pub cumulative_rounds: bool,
    pub team_aggregate: bool,
    pub handicap_allowed: bool,
    /// Highest phase 1 jumping faults that still allow a start in phase 2
    pub phase_two_fault_ceiling: Option<Decimal>,
    pub required_parameters: &'static [ClassParameter],
}

const CLOCK: &[ClassParameter] = &[ClassParameter::TimeAllowed];
const OPTIMUM: &[ClassParameter] = &[ClassParameter::OptimumTime];
const TWO_PHASE: &[ClassParameter] = &[
    ClassParameter::TimeAllowed,
    ClassParameter::TimeAllowedRound2,
];
const ACCUMULATOR: &[ClassParameter] = &[ClassParameter::TimeAllowed, ClassParameter::MaxPoints];

impl RuleProfile {
    fn individual(rule: ClassRule, rounds: RoundPlan, time_mode: TimeMode) -> Self {
        let (time_decider, required_parameters) = match time_mode {
            TimeMode::AgainstClock => (TimeDecider::Always, CLOCK),
            TimeMode::Optimum => (TimeDecider::Always, OPTIMUM),
            TimeMode::TwoPhase => (TimeDecider::Always, TWO_PHASE),
            TimeMode::NotAgainstClock => (TimeDecider::Never, &[][..]),
        };

        Self {
            rule,
            rounds,
            basis: ScoringBasis::Faults,
            time_mode,
            time_decider,
            cumulative_rounds: false,
            team_aggregate: false,
            handicap_allowed: true,
            phase_two_fault_ceiling: None,
            required_parameters,
        }
    }

    /// Accepted values for a class's `number_of_rounds` (the jump-off counts as a round).
    pub fn accepts_round_count(&self, number_of_rounds: i32) -> bool {
        let main = self.rounds.main_rounds();
        number_of_rounds == main || (self.rounds.allows_jumpoff() && number_of_rounds == main + 1)
    }

    pub fn missing_parameters(&self, class: &CompetitionClass) -> Vec<ClassParameter> {
        self.required_parameters
            .iter()
            .copied()
            .filter(|param| !param.is_set(class))
            .collect()
    }
}

impl ClassRule {
    pub const ALL: [ClassRule; 11] = [
        Self::OneRoundAgainstClock,
        Self::OneRoundNotAgainstClock,
        Self::OptimumTime,
        Self::SpecialTwoPhases,
        Self::TwoPhases,
        Self::OneRoundWithJumpoff,
        Self::TwoRoundsWithTiebreaker,
        Self::TwoRoundsTeamWithTiebreaker,
        Self::Accumulator,
        Self::SpeedAndHandiness,
        Self::SixBars,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneRoundAgainstClock => "one_round_against_clock",
            Self::OneRoundNotAgainstClock => "one_round_not_against_clock",
            Self::OptimumTime => "optimum_time",
            Self::SpecialTwoPhases => "special_two_phases",
            Self::TwoPhases => "two_phases",
            Self::OneRoundWithJumpoff => "one_round_with_jumpoff",
            Self::TwoRoundsWithTiebreaker => "two_rounds_with_tiebreaker",
            Self::TwoRoundsTeamWithTiebreaker => "two_rounds_team_with_tiebreaker",
            Self::Accumulator => "accumulator",
            Self::SpeedAndHandiness => "speed_and_handiness",
            Self::SixBars => "six_bars",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(ClassRule::as_str).collect()
    }

    pub fn profile(&self) -> RuleProfile {
        use RoundPlan::*;
        use TimeMode::*;

        match self {
            Self::OneRoundAgainstClock => RuleProfile::individual(*self, Single, AgainstClock),
            Self::OneRoundNotAgainstClock => {
                RuleProfile::individual(*self, Single, NotAgainstClock)
            }
            Self::OptimumTime => RuleProfile::individual(*self, Single, Optimum),
            Self::SpeedAndHandiness => RuleProfile::individual(*self, Single, Optimum),
            Self::SixBars => RuleProfile::individual(*self, Single, AgainstClock),
            Self::SpecialTwoPhases => RuleProfile {
                phase_two_fault_ceiling: Some(Decimal::ZERO),
                ..RuleProfile::individual(*self, Double, TwoPhase)
            },
            Self::TwoPhases => RuleProfile {
                phase_two_fault_ceiling: Some(Decimal::from(4)),
                ..RuleProfile::individual(*self, Double, TwoPhase)
            },
            Self::OneRoundWithJumpoff => RuleProfile {
                time_decider: TimeDecider::JumpoffOnly,
                ..RuleProfile::individual(*self, SingleWithJumpoff, AgainstClock)
            },
            Self::TwoRoundsWithTiebreaker => RuleProfile {
                time_decider: TimeDecider::JumpoffOnly,
                cumulative_rounds: true,
                ..RuleProfile::individual(*self, DoubleWithJumpoff, AgainstClock)
            },
            Self::TwoRoundsTeamWithTiebreaker => RuleProfile {
                time_decider: TimeDecider::JumpoffOnly,
                cumulative_rounds: true,
                team_aggregate: true,
                handicap_allowed: false,
                ..RuleProfile::individual(*self, DoubleWithJumpoff, AgainstClock)
            },
            Self::Accumulator => RuleProfile {
                basis: ScoringBasis::Points,
                required_parameters: ACCUMULATOR,
                ..RuleProfile::individual(*self, Single, AgainstClock)
            },
        }
    }

    fn parse_str(s: &str) -> Result<Self, UnknownVariant> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|rule| rule.as_str() == normalized)
            .ok_or_else(|| UnknownVariant::new("class rule", s, &Self::names()))
    }
}

impl FromStr for ClassRule {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl TryFrom<String> for ClassRule {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_str(&value)
    }
}

impl fmt::Display for ClassRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_eleven_distinct_rules() {
        let mut names = ClassRule::names();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 11);
    }

    #[test]
    fn test_wire_names_match_catalog_names() {
        for rule in ClassRule::ALL {
            let json = serde_json::to_value(rule).unwrap();
            assert_eq!(json, serde_json::Value::String(rule.as_str().to_string()));
            assert_eq!(serde_json::from_value::<ClassRule>(json).unwrap(), rule);
        }
    }

    #[test]
    fn test_rule_parsing() {
        assert_eq!(
            "two_rounds_team_with_tiebreaker".parse::<ClassRule>().unwrap(),
            ClassRule::TwoRoundsTeamWithTiebreaker
        );
        assert_eq!(
            ClassRule::try_from("Six-Bars".to_string()).unwrap(),
            ClassRule::SixBars
        );
        for rule in ClassRule::ALL {
            assert_eq!(rule.as_str().parse::<ClassRule>().unwrap(), rule);
            assert_eq!(rule.profile().rule, rule);
        }

        assert!("puissance".parse::<ClassRule>().is_err());
        assert!("".parse::<ClassRule>().is_err());
    }

    #[test]
    fn test_only_accumulator_counts_points() {
        for rule in ClassRule::ALL {
            let expected = rule == ClassRule::Accumulator;
            assert_eq!(rule.profile().basis.higher_is_better(), expected, "{rule}");
        }
    }

    #[test]
    fn test_jumpoff_rules_decide_on_time_only_in_jumpoff() {
        for rule in ClassRule::ALL {
            let profile = rule.profile();
            if profile.rounds.allows_jumpoff() {
                assert_eq!(profile.time_decider, TimeDecider::JumpoffOnly, "{rule}");
            }
        }
        assert!(!ClassRule::OneRoundNotAgainstClock.profile().time_decider.applies(true));
    }

    #[test]
    fn test_round_counts() {
        let jumpoff = ClassRule::OneRoundWithJumpoff.profile();
        assert!(jumpoff.accepts_round_count(1));
        assert!(jumpoff.accepts_round_count(2));
        assert!(!jumpoff.accepts_round_count(3));

        let two_phases = ClassRule::TwoPhases.profile();
        assert!(two_phases.accepts_round_count(2));
        assert!(!two_phases.accepts_round_count(3));
        assert!(!two_phases.accepts_round_count(1));
    }

    #[test]
    fn test_only_team_rule_aggregates() {
        let teams: Vec<ClassRule> = ClassRule::ALL
            .into_iter()
            .filter(|rule| rule.profile().team_aggregate)
            .collect();
        assert_eq!(teams, vec![ClassRule::TwoRoundsTeamWithTiebreaker]);
    }
}
