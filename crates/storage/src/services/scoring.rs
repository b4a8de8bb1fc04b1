//! Turns a judges' submission into a stored score and refreshes the class placings.

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ranking::{Placing, rerank_class};
use crate::dto::score::{SubmitScoreRequest, SubmitScoreResponse};
use crate::error::{EngineError, EngineResult, NotFoundContext};
use crate::models::{CompetitionClass, EventStatus, Score, ScoreStatus, StartlistEntry};
use crate::rules::{RoundInput, ScoreContext, ScoreOutcome, TimeMode};
use crate::store::CompetitionStore;

pub async fn submit_score(
    store: &dyn CompetitionStore,
    request: &SubmitScoreRequest,
    now: NaiveDateTime,
) -> EngineResult<SubmitScoreResponse> {
    let (Some(startlist_id), Some(class_id)) = (request.startlist_id, request.class_id) else {
        return Err(EngineError::Validation(
            "startlist_id and class_id are required".to_string(),
        ));
    };

    let class = store
        .find_class(class_id)
        .await
        .or_not_found(|| format!("Class {class_id} not found"))?;
    let entry = store
        .find_entry(startlist_id)
        .await
        .or_not_found(|| format!("Start list entry {startlist_id} not found"))?;

    check_submission(store, &class, &entry, request).await?;

    let profile = class.class_rule.profile();
    let phase_one = if profile.time_mode == TimeMode::TwoPhase && request.round_number > 1 {
        store.find_entry_score(startlist_id, 1, false).await?
    } else {
        None
    };

    let input = RoundInput {
        round_number: request.round_number,
        is_jumpoff: request.is_jumpoff,
        time_taken: request.time_taken,
        jumping_faults: request.jumping_faults,
        points: request.points,
    };
    let ctx = ScoreContext {
        class: &class,
        phase_one: phase_one.as_ref(),
    };
    let outcome = class.class_rule.score(&input, &ctx)?;

    let previous = store
        .find_entry_score(startlist_id, request.round_number, request.is_jumpoff)
        .await?;
    let was_completed = previous.as_ref().is_some_and(Score::is_completed);

    let score = build_score(&entry, &input, outcome, previous, now);
    let stored = store.upsert_score(&score).await?;

    let mut placings_changed = stored.is_completed() || was_completed;
    if profile.time_mode == TimeMode::TwoPhase && request.round_number == 1 {
        placings_changed |= refresh_phase_two(store, &class, &entry, now).await?;
    }

    let placings = if placings_changed {
        rerank_class(store, class_id).await?
    } else {
        Vec::new()
    };

    let score = store.find_score(stored.score_id).await?;
    info!(
        score_id = %score.score_id,
        class_id = %class_id,
        round = score.round_number,
        jumpoff = score.is_jumpoff,
        status = %score.status,
        rank = ?score.rank,
        "Score submitted"
    );

    Ok(SubmitScoreResponse { score, placings })
}

async fn check_submission(
    store: &dyn CompetitionStore,
    class: &CompetitionClass,
    entry: &StartlistEntry,
    request: &SubmitScoreRequest,
) -> EngineResult<()> {
    if entry.class_id != class.class_id {
        return Err(EngineError::Validation(format!(
            "Start list entry {} does not belong to class {}",
            entry.startlist_id, class.class_id
        )));
    }

    if class.status == EventStatus::Cancelled {
        return Err(EngineError::Validation(format!(
            "Class '{}' is cancelled",
            class.class_name
        )));
    }

    let profile = class.class_rule.profile();
    let main_rounds = profile.rounds.main_rounds();
    if request.round_number < 1 || request.round_number > main_rounds {
        return Err(EngineError::Validation(format!(
            "round_number must be between 1 and {main_rounds} for rule {}",
            class.class_rule
        )));
    }

    if request.is_jumpoff {
        if !profile.rounds.allows_jumpoff() {
            return Err(EngineError::Validation(format!(
                "Rule {} has no jump-off",
                class.class_rule
            )));
        }

        let qualified = store
            .find_entry_score(entry.startlist_id, request.round_number, false)
            .await?
            .is_some_and(|s| s.qualified_for_jumpoff);
        if !qualified {
            return Err(EngineError::Validation(format!(
                "Entry {} did not qualify for the jump-off after round {}",
                entry.startlist_id, request.round_number
            )));
        }
    }

    Ok(())
}

/// Pending scores keep the raw values but carry no computed totals.
fn build_score(
    entry: &StartlistEntry,
    input: &RoundInput,
    outcome: ScoreOutcome,
    previous: Option<Score>,
    now: NaiveDateTime,
) -> Score {
    let (score_id, created_at, rank, qualified_for_jumpoff) = match previous {
        Some(p) => (p.score_id, p.created_at, p.rank, p.qualified_for_jumpoff),
        None => (Uuid::new_v4(), now, None, false),
    };

    let mut score = Score {
        score_id,
        startlist_id: entry.startlist_id,
        class_id: entry.class_id,
        round_number: input.round_number,
        is_jumpoff: input.is_jumpoff,
        time_taken: input.time_taken,
        time_faults: None,
        jumping_faults: input.jumping_faults,
        total_faults: None,
        points: input.points,
        final_time: None,
        status: ScoreStatus::Pending,
        qualified_for_jumpoff,
        rank,
        scored_at: None,
        created_at,
        updated_at: now,
    };

    match outcome {
        ScoreOutcome::Pending => {
            debug!(startlist_id = %entry.startlist_id, "Submission incomplete, score left pending");
        }
        ScoreOutcome::Completed(result) => {
            score.time_faults = result.time_faults;
            score.jumping_faults = Some(result.jumping_faults);
            score.total_faults = Some(result.total_faults);
            score.points = result.points;
            score.final_time = result.final_time;
            score.status = ScoreStatus::Completed;
            score.scored_at = Some(now);
        }
    }

    score
}

/// Removes a score (an operator correction) and re-ranks what is left of its class.
pub async fn delete_score(
    store: &dyn CompetitionStore,
    score_id: Uuid,
    now: NaiveDateTime,
) -> EngineResult<Vec<Placing>> {
    let score = store
        .find_score(score_id)
        .await
        .or_not_found(|| format!("Score {score_id} not found"))?;

    store.delete_score(score_id).await?;
    info!(score_id = %score_id, class_id = %score.class_id, "Score deleted");

    let class = store
        .find_class(score.class_id)
        .await
        .or_not_found(|| format!("Class {} not found", score.class_id))?;
    if class.class_rule.profile().time_mode == TimeMode::TwoPhase
        && score.round_number == 1
        && !score.is_jumpoff
    {
        let entry = store
            .find_entry(score.startlist_id)
            .await
            .or_not_found(|| format!("Start list entry {} not found", score.startlist_id))?;
        refresh_phase_two(store, &class, &entry, now).await?;
    }

    rerank_class(store, score.class_id).await
}

/// Re-scores an entry's phase 2 against its current phase 1. A phase 2 that is no longer
/// allowed (phase 1 missing, pending or over the fault ceiling) drops back to pending.
///
/// Returns whether the class placings need refreshing.
async fn refresh_phase_two(
    store: &dyn CompetitionStore,
    class: &CompetitionClass,
    entry: &StartlistEntry,
    now: NaiveDateTime,
) -> EngineResult<bool> {
    let Some(phase_two) = store.find_entry_score(entry.startlist_id, 2, false).await? else {
        return Ok(false);
    };
    let phase_one = store.find_entry_score(entry.startlist_id, 1, false).await?;

    let input = RoundInput {
        round_number: 2,
        is_jumpoff: false,
        time_taken: phase_two.time_taken,
        jumping_faults: phase_two.jumping_faults,
        points: phase_two.points,
    };
    let ctx = ScoreContext {
        class,
        phase_one: phase_one.as_ref(),
    };
    let outcome = match class.class_rule.score(&input, &ctx) {
        Ok(outcome) => outcome,
        Err(EngineError::Validation(reason)) => {
            warn!(
                startlist_id = %entry.startlist_id,
                reason = %reason,
                "Phase 2 no longer eligible, score reset to pending"
            );
            ScoreOutcome::Pending
        }
        Err(e) => return Err(e),
    };

    let was_completed = phase_two.is_completed();
    let rescored = build_score(entry, &input, outcome, Some(phase_two), now);
    store.upsert_score(&rescored).await?;
    debug!(score_id = %rescored.score_id, status = %rescored.status, "Phase 2 re-scored");

    Ok(was_completed || rescored.is_completed())
}
