use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::ranking::{RoundScope, rank_scope, team_standings};
use crate::dto::results::{ClassResults, ResultRow};
use crate::error::{EngineResult, NotFoundContext};
use crate::models::{Score, StartlistEntry};
use crate::store::CompetitionStore;

/// Results board of one scope: ranked entries in placing order, then the unranked ones
/// (pending, or not eligible for the scope) in running order.
pub async fn class_results(
    store: &dyn CompetitionStore,
    class_id: Uuid,
    scope: RoundScope,
) -> EngineResult<ClassResults> {
    let class = store
        .find_class(class_id)
        .await
        .or_not_found(|| format!("Class {class_id} not found"))?;
    let entries = store.list_startlist(class_id).await?;
    let scores = store.list_class_scores(class_id).await?;

    let by_entry: HashMap<Uuid, &StartlistEntry> =
        entries.iter().map(|e| (e.startlist_id, e)).collect();
    let by_score: HashMap<Uuid, &Score> = scores.iter().map(|s| (s.score_id, s)).collect();

    let placings = rank_scope(&class, &entries, &scores, scope);
    let mut rows: Vec<ResultRow> = placings
        .iter()
        .filter_map(|p| {
            let score = by_score.get(&p.score_id)?;
            let entry = by_entry.get(&p.startlist_id)?;
            Some(ResultRow::new(entry, score, Some(p)))
        })
        .collect();

    let placed: HashSet<Uuid> = placings.iter().map(|p| p.score_id).collect();
    let mut unplaced: Vec<ResultRow> = scores
        .iter()
        .filter(|s| {
            !placed.contains(&s.score_id)
                && s.round_number == scope.round_number
                && s.is_jumpoff == scope.is_jumpoff
        })
        .filter_map(|s| {
            let entry = by_entry.get(&s.startlist_id)?;
            Some(ResultRow::new(entry, s, None))
        })
        .collect();
    unplaced.sort_by_key(|row| row.start_order);
    rows.append(&mut unplaced);

    Ok(ClassResults {
        class_id,
        class_name: class.class_name.clone(),
        class_rule: class.class_rule,
        round_number: scope.round_number,
        is_jumpoff: scope.is_jumpoff,
        rows,
        teams: team_standings(&class, &entries, &scores),
    })
}
