use rust_decimal::Decimal;

use super::catalog::{ClassParameter, ClassRule, RuleProfile};
use crate::error::{EngineError, EngineResult};
use crate::models::{CompetitionClass, Score};

/// Time faults per commenced second over the time allowed (or away from the optimum time).
pub const TIME_FAULTS_PER_SECOND: Decimal = Decimal::ONE;

/// Raw values recorded by the judges for one round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundInput {
    pub round_number: i32,
    pub is_jumpoff: bool,
    pub time_taken: Option<Decimal>,
    pub jumping_faults: Option<Decimal>,
    pub points: Option<Decimal>,
}

/// What a rule may look at besides the submitted round.
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext<'a> {
    pub class: &'a CompetitionClass,
    /// The entry's round 1 score, consulted by the two-phase rules
    pub phase_one: Option<&'a Score>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreComputation {
    pub time_faults: Option<Decimal>,
    pub jumping_faults: Decimal,
    pub total_faults: Decimal,
    pub points: Option<Decimal>,
    pub final_time: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    /// Not every value the rule needs has been recorded yet
    Pending,
    Completed(ScoreComputation),
}

/// Faults for `time_taken` against `limit`, one per commenced second over.
pub fn time_penalty(time_taken: Decimal, limit: Decimal) -> Decimal {
    ((time_taken - limit).ceil() * TIME_FAULTS_PER_SECOND).max(Decimal::ZERO)
}

impl RoundInput {
    fn check_values(&self) -> EngineResult<()> {
        if self.round_number < 1 {
            return Err(EngineError::Validation(
                "round_number must be >= 1".to_string(),
            ));
        }

        let fields = [
            ("time_taken", self.time_taken),
            ("jumping_faults", self.jumping_faults),
            ("points", self.points),
        ];
        for (name, value) in fields {
            if value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()) {
                return Err(EngineError::Validation(format!("{name} cannot be negative")));
            }
        }

        Ok(())
    }

    fn time_and_faults(&self) -> Option<(Decimal, Decimal)> {
        Some((self.time_taken?, self.jumping_faults?))
    }
}

impl ClassRule {
    /// Computes the faults, points and deciding time of one round under this rule.
    pub fn score(&self, input: &RoundInput, ctx: &ScoreContext<'_>) -> EngineResult<ScoreOutcome> {
        input.check_values()?;

        let profile = self.profile();
        let missing = profile.missing_parameters(ctx.class);
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(ClassParameter::as_str).collect();
            return Err(EngineError::InvalidRuleParameters(format!(
                "class '{}' uses rule {} but has no {}",
                ctx.class.class_name,
                self,
                names.join(", ")
            )));
        }

        match self {
            Self::OneRoundAgainstClock
            | Self::OneRoundWithJumpoff
            | Self::TwoRoundsWithTiebreaker
            | Self::TwoRoundsTeamWithTiebreaker
            | Self::SixBars => score_against_clock(input, ctx.class),
            Self::Accumulator => score_accumulator(input, ctx.class),
            Self::OptimumTime | Self::SpeedAndHandiness => score_optimum_time(input, ctx.class),
            Self::SpecialTwoPhases | Self::TwoPhases => score_two_phase(&profile, input, ctx),
            Self::OneRoundNotAgainstClock => Ok(score_not_against_clock(input)),
        }
    }
}

/// Round 1 runs against `time_allowed`; later rounds and jump-offs against
/// `time_allowed_round2` when the class sets one.
fn time_allowed_for(class: &CompetitionClass, input: &RoundInput) -> EngineResult<Decimal> {
    let allowed = if input.is_jumpoff || input.round_number > 1 {
        class.time_allowed_round2.or(class.time_allowed)
    } else {
        class.time_allowed
    };

    allowed.ok_or_else(|| {
        EngineError::InvalidRuleParameters(format!(
            "class '{}' has no time_allowed",
            class.class_name
        ))
    })
}

fn score_against_clock(
    input: &RoundInput,
    class: &CompetitionClass,
) -> EngineResult<ScoreOutcome> {
    let allowed = time_allowed_for(class, input)?;
    let Some((time_taken, jumping_faults)) = input.time_and_faults() else {
        return Ok(ScoreOutcome::Pending);
    };

    let time_faults = time_penalty(time_taken, allowed);

    Ok(ScoreOutcome::Completed(ScoreComputation {
        time_faults: Some(time_faults),
        jumping_faults,
        total_faults: jumping_faults + time_faults,
        points: None,
        final_time: Some(time_taken),
    }))
}

fn score_optimum_time(
    input: &RoundInput,
    class: &CompetitionClass,
) -> EngineResult<ScoreOutcome> {
    let optimum = class.optimum_time.ok_or_else(|| {
        EngineError::InvalidRuleParameters(format!(
            "class '{}' has no optimum_time",
            class.class_name
        ))
    })?;
    let Some((time_taken, jumping_faults)) = input.time_and_faults() else {
        return Ok(ScoreOutcome::Pending);
    };

    let deviation = (time_taken - optimum).abs();
    let time_faults = deviation.ceil() * TIME_FAULTS_PER_SECOND;

    Ok(ScoreOutcome::Completed(ScoreComputation {
        time_faults: Some(time_faults),
        jumping_faults,
        total_faults: jumping_faults + time_faults,
        points: None,
        final_time: Some(time_taken),
    }))
}

fn score_two_phase(
    profile: &RuleProfile,
    input: &RoundInput,
    ctx: &ScoreContext<'_>,
) -> EngineResult<ScoreOutcome> {
    if input.round_number == 1 {
        return score_against_clock(input, ctx.class);
    }

    let phase_one = ctx
        .phase_one
        .filter(|score| score.is_completed())
        .ok_or_else(|| {
            EngineError::Validation("phase 2 requires a completed phase 1 score".to_string())
        })?;
    let phase_one_faults = phase_one.jumping_faults.unwrap_or(Decimal::ZERO);
    let ceiling = profile.phase_two_fault_ceiling.unwrap_or(Decimal::ZERO);
    if phase_one_faults > ceiling {
        return Err(EngineError::Validation(format!(
            "{phase_one_faults} jumping faults in phase 1 exceed the ceiling of {ceiling} for phase 2"
        )));
    }
    let phase_one_time = phase_one.time_taken.ok_or_else(|| {
        EngineError::Validation("phase 1 score has no recorded time".to_string())
    })?;

    let (Some(first_allowed), Some(second_allowed)) =
        (ctx.class.time_allowed, ctx.class.time_allowed_round2)
    else {
        return Err(EngineError::InvalidRuleParameters(format!(
            "class '{}' needs time_allowed and time_allowed_round2 for phase 2",
            ctx.class.class_name
        )));
    };

    let Some((time_taken, jumping_faults)) = input.time_and_faults() else {
        return Ok(ScoreOutcome::Pending);
    };

    // The phase 2 row keeps its own jumping faults so it can be re-scored when phase 1
    // changes; its total carries both phases.
    let combined_time = phase_one_time + time_taken;
    let time_faults = time_penalty(combined_time, first_allowed + second_allowed);

    Ok(ScoreOutcome::Completed(ScoreComputation {
        time_faults: Some(time_faults),
        jumping_faults,
        total_faults: phase_one_faults + jumping_faults + time_faults,
        points: None,
        final_time: Some(combined_time),
    }))
}

fn score_accumulator(
    input: &RoundInput,
    class: &CompetitionClass,
) -> EngineResult<ScoreOutcome> {
    let allowed = time_allowed_for(class, input)?;
    let max_points = class.max_points.ok_or_else(|| {
        EngineError::InvalidRuleParameters(format!(
            "class '{}' has no max_points",
            class.class_name
        ))
    })?;
    let (Some(points), Some(time_taken)) = (input.points, input.time_taken) else {
        return Ok(ScoreOutcome::Pending);
    };

    let time_faults = time_penalty(time_taken, allowed);
    let jumping_faults = input.jumping_faults.unwrap_or(Decimal::ZERO);
    let points = (points.min(max_points) - time_faults).max(Decimal::ZERO);

    Ok(ScoreOutcome::Completed(ScoreComputation {
        time_faults: Some(time_faults),
        jumping_faults,
        total_faults: jumping_faults + time_faults,
        points: Some(points),
        final_time: Some(time_taken),
    }))
}

fn score_not_against_clock(input: &RoundInput) -> ScoreOutcome {
    let Some(jumping_faults) = input.jumping_faults else {
        return ScoreOutcome::Pending;
    };

    ScoreOutcome::Completed(ScoreComputation {
        time_faults: None,
        jumping_faults,
        total_faults: jumping_faults,
        points: None,
        final_time: input.time_taken,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{class_with_rule, completed_score, dec};

    fn input(round: i32, time: &str, faults: &str) -> RoundInput {
        RoundInput {
            round_number: round,
            time_taken: Some(dec(time)),
            jumping_faults: Some(dec(faults)),
            ..Default::default()
        }
    }

    fn completed(outcome: ScoreOutcome) -> ScoreComputation {
        match outcome {
            ScoreOutcome::Completed(result) => result,
            ScoreOutcome::Pending => panic!("expected a completed score"),
        }
    }

    #[test]
    fn test_time_penalty_counts_commenced_seconds() {
        assert_eq!(time_penalty(dec("63.2"), dec("60")), dec("4"));
        assert_eq!(time_penalty(dec("61"), dec("60")), dec("1"));
        assert_eq!(time_penalty(dec("60"), dec("60")), Decimal::ZERO);
        assert_eq!(time_penalty(dec("58.7"), dec("60")), Decimal::ZERO);
    }

    #[test]
    fn test_against_clock_adds_time_faults_to_jumping_faults() {
        let mut class = class_with_rule(ClassRule::OneRoundAgainstClock);
        class.time_allowed = Some(dec("60"));
        let ctx = ScoreContext { class: &class, phase_one: None };

        let result = completed(
            ClassRule::OneRoundAgainstClock
                .score(&input(1, "63.2", "4"), &ctx)
                .unwrap(),
        );

        assert_eq!(result.time_faults, Some(dec("4")));
        assert_eq!(result.jumping_faults, dec("4"));
        assert_eq!(result.total_faults, dec("8"));
        assert_eq!(result.final_time, Some(dec("63.2")));
    }

    #[test]
    fn test_clock_rule_without_time_allowed_is_rejected() {
        let class = class_with_rule(ClassRule::SixBars);
        let ctx = ScoreContext { class: &class, phase_one: None };

        let err = ClassRule::SixBars
            .score(&input(1, "50", "0"), &ctx)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRuleParameters(_)));
    }

    #[test]
    fn test_missing_time_leaves_score_pending() {
        let mut class = class_with_rule(ClassRule::OneRoundAgainstClock);
        class.time_allowed = Some(dec("60"));
        let ctx = ScoreContext { class: &class, phase_one: None };
        let partial = RoundInput {
            round_number: 1,
            jumping_faults: Some(dec("4")),
            ..Default::default()
        };

        assert_eq!(
            ClassRule::OneRoundAgainstClock.score(&partial, &ctx).unwrap(),
            ScoreOutcome::Pending
        );
    }

    #[test]
    fn test_jumpoff_runs_against_round_two_time() {
        let mut class = class_with_rule(ClassRule::OneRoundWithJumpoff);
        class.time_allowed = Some(dec("72"));
        class.time_allowed_round2 = Some(dec("45"));
        let ctx = ScoreContext { class: &class, phase_one: None };
        let jumpoff = RoundInput {
            is_jumpoff: true,
            ..input(1, "46.5", "0")
        };

        let result = completed(ClassRule::OneRoundWithJumpoff.score(&jumpoff, &ctx).unwrap());
        assert_eq!(result.total_faults, dec("2"));
    }

    #[test]
    fn test_optimum_time_penalizes_both_directions() {
        let mut class = class_with_rule(ClassRule::OptimumTime);
        class.optimum_time = Some(dec("70"));
        let ctx = ScoreContext { class: &class, phase_one: None };

        let fast = completed(ClassRule::OptimumTime.score(&input(1, "67.5", "0"), &ctx).unwrap());
        let slow = completed(ClassRule::OptimumTime.score(&input(1, "71.2", "4"), &ctx).unwrap());
        let exact = completed(ClassRule::OptimumTime.score(&input(1, "70", "0"), &ctx).unwrap());

        assert_eq!(fast.total_faults, dec("3"));
        assert_eq!(slow.total_faults, dec("6"));
        assert_eq!(exact.total_faults, Decimal::ZERO);
    }

    #[test]
    fn test_not_against_clock_ignores_time() {
        let class = class_with_rule(ClassRule::OneRoundNotAgainstClock);
        let ctx = ScoreContext { class: &class, phase_one: None };

        let result = completed(
            ClassRule::OneRoundNotAgainstClock
                .score(&input(1, "200", "4"), &ctx)
                .unwrap(),
        );
        assert_eq!(result.time_faults, None);
        assert_eq!(result.total_faults, dec("4"));
    }

    #[test]
    fn test_accumulator_deducts_time_faults_from_capped_points() {
        let mut class = class_with_rule(ClassRule::Accumulator);
        class.time_allowed = Some(dec("60"));
        class.max_points = Some(dec("65"));
        let ctx = ScoreContext { class: &class, phase_one: None };
        let round = RoundInput {
            round_number: 1,
            time_taken: Some(dec("61.4")),
            points: Some(dec("70")),
            ..Default::default()
        };

        let result = completed(ClassRule::Accumulator.score(&round, &ctx).unwrap());
        assert_eq!(result.points, Some(dec("63")));
        assert_eq!(result.time_faults, Some(dec("2")));
    }

    #[test]
    fn test_accumulator_requires_max_points() {
        let mut class = class_with_rule(ClassRule::Accumulator);
        class.time_allowed = Some(dec("60"));
        let ctx = ScoreContext { class: &class, phase_one: None };
        let round = RoundInput {
            round_number: 1,
            time_taken: Some(dec("50")),
            points: Some(dec("40")),
            ..Default::default()
        };

        assert!(matches!(
            ClassRule::Accumulator.score(&round, &ctx),
            Err(EngineError::InvalidRuleParameters(_))
        ));
    }

    #[test]
    fn test_phase_two_uses_combined_time_allowed() {
        let mut class = class_with_rule(ClassRule::SpecialTwoPhases);
        class.time_allowed = Some(dec("50"));
        class.time_allowed_round2 = Some(dec("30"));
        let phase_one = completed_score(&class, 1, "49", "0");
        let ctx = ScoreContext {
            class: &class,
            phase_one: Some(&phase_one),
        };

        let result = completed(
            ClassRule::SpecialTwoPhases
                .score(&input(2, "32.1", "4"), &ctx)
                .unwrap(),
        );
        assert_eq!(result.final_time, Some(dec("81.1")));
        assert_eq!(result.time_faults, Some(dec("2")));
        assert_eq!(result.jumping_faults, dec("4"));
        assert_eq!(result.total_faults, dec("6"));
    }

    #[test]
    fn test_phase_one_faults_over_ceiling_block_phase_two() {
        let mut class = class_with_rule(ClassRule::SpecialTwoPhases);
        class.time_allowed = Some(dec("50"));
        class.time_allowed_round2 = Some(dec("30"));
        let phase_one = completed_score(&class, 1, "45", "4");
        let ctx = ScoreContext {
            class: &class,
            phase_one: Some(&phase_one),
        };

        let err = ClassRule::SpecialTwoPhases
            .score(&input(2, "30", "0"), &ctx)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        // Four faults are still within the ceiling of the plain two-phase rule.
        class.class_rule = ClassRule::TwoPhases;
        let ctx = ScoreContext {
            class: &class,
            phase_one: Some(&phase_one),
        };
        let result = completed(ClassRule::TwoPhases.score(&input(2, "30", "4"), &ctx).unwrap());
        assert_eq!(result.jumping_faults, dec("4"));
        assert_eq!(result.total_faults, dec("8"));
    }

    #[test]
    fn test_phase_two_without_phase_one_is_rejected() {
        let mut class = class_with_rule(ClassRule::TwoPhases);
        class.time_allowed = Some(dec("50"));
        class.time_allowed_round2 = Some(dec("30"));
        let ctx = ScoreContext { class: &class, phase_one: None };

        assert!(matches!(
            ClassRule::TwoPhases.score(&input(2, "30", "0"), &ctx),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn test_negative_values_are_rejected() {
        let class = class_with_rule(ClassRule::OneRoundNotAgainstClock);
        let ctx = ScoreContext { class: &class, phase_one: None };

        assert!(matches!(
            ClassRule::OneRoundNotAgainstClock.score(&input(1, "50", "-4"), &ctx),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            ClassRule::OneRoundNotAgainstClock.score(&input(0, "50", "4"), &ctx),
            Err(EngineError::Validation(_))
        ));
    }
}
