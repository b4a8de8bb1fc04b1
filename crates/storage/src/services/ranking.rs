//! Placings for a round scope and team standings.
//!
//! Ranking is standard competition ranking: entries level on every deciding key share a
//! rank and the next entry skips accordingly (1, 2, 2, 4). Running order only fixes the
//! listing order of tied entries, never their rank.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{EngineResult, NotFoundContext};
use crate::models::{CompetitionClass, Score, StartlistEntry};
use crate::rules::{RuleProfile, TimeMode};
use crate::store::CompetitionStore;

/// Number of member results that count towards a team's round total.
pub const TEAM_COUNTING_MEMBERS: usize = 3;

/// The set of scores ranked against each other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub struct RoundScope {
    pub round_number: i32,
    pub is_jumpoff: bool,
}

impl RoundScope {
    pub fn of(score: &Score) -> Self {
        Self {
            round_number: score.round_number,
            is_jumpoff: score.is_jumpoff,
        }
    }

    fn contains(&self, score: &Score) -> bool {
        score.round_number == self.round_number && score.is_jumpoff == self.is_jumpoff
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Placing {
    pub score_id: Uuid,
    pub startlist_id: Uuid,
    pub rank: i32,
    pub qualified_for_jumpoff: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TeamStanding {
    pub rank: i32,
    pub team_name: String,
    pub total_faults: Decimal,
    pub total_time: Decimal,
    /// Main rounds in which at least one member result counted
    pub rounds_counted: usize,
    pub members: usize,
}

struct Contender<'a> {
    score: &'a Score,
    start_order: i32,
    primary: Decimal,
    time: Option<Decimal>,
}

/// Orders the completed scores of one scope and assigns ranks and jump-off qualification.
///
/// The result follows the listing order: rank, then running order.
pub fn rank_scope(
    class: &CompetitionClass,
    entries: &[StartlistEntry],
    scores: &[Score],
    scope: RoundScope,
) -> Vec<Placing> {
    let profile = class.class_rule.profile();
    let start_orders: HashMap<Uuid, i32> = entries
        .iter()
        .map(|e| (e.startlist_id, e.start_order))
        .collect();
    let time_decides = profile.time_decider.applies(scope.is_jumpoff);
    let eligible = eligible_entries(class, &profile, entries, scores, scope);

    let mut contenders: Vec<Contender> = scores
        .iter()
        .filter(|s| s.is_completed() && scope.contains(s))
        .filter(|s| eligible.as_ref().is_none_or(|ids| ids.contains(&s.startlist_id)))
        .map(|score| Contender {
            score,
            start_order: start_orders
                .get(&score.startlist_id)
                .copied()
                .unwrap_or(i32::MAX),
            primary: primary_key(&profile, score, scores, scope),
            time: time_decides
                .then(|| deciding_time(&profile, class, score))
                .flatten(),
        })
        .collect();

    contenders.sort_by(|a, b| {
        compare_primary(&profile, a.primary, b.primary)
            .then_with(|| compare_time(a.time, b.time))
            .then_with(|| a.start_order.cmp(&b.start_order))
            .then_with(|| a.score.score_id.cmp(&b.score.score_id))
    });

    let ranks = competition_ranks(&contenders, |a, b| {
        a.primary == b.primary && a.time == b.time
    });

    // Any main round can send its leaders to a jump-off; two-round classes normally run
    // theirs after round 2, but one following round 1 is accepted as well.
    let leaders = ranks.iter().filter(|&&rank| rank == 1).count();
    let jumpoff_needed = profile.rounds.allows_jumpoff() && !scope.is_jumpoff && leaders >= 2;

    contenders
        .iter()
        .zip(ranks)
        .map(|(c, rank)| Placing {
            score_id: c.score.score_id,
            startlist_id: c.score.startlist_id,
            rank,
            qualified_for_jumpoff: jumpoff_needed && rank == 1,
        })
        .collect()
}

/// Entries allowed into `scope`, or `None` when every completed score counts.
///
/// A jump-off only admits the qualified leaders of the main round it follows, as they stand
/// now. Later rounds of cumulative rules only rank entries that completed every earlier round.
fn eligible_entries(
    class: &CompetitionClass,
    profile: &RuleProfile,
    entries: &[StartlistEntry],
    scores: &[Score],
    scope: RoundScope,
) -> Option<HashSet<Uuid>> {
    if scope.is_jumpoff {
        let main_round = RoundScope {
            round_number: scope.round_number,
            is_jumpoff: false,
        };
        let qualified = rank_scope(class, entries, scores, main_round)
            .into_iter()
            .filter(|p| p.qualified_for_jumpoff)
            .map(|p| p.startlist_id)
            .collect();
        return Some(qualified);
    }

    if !profile.cumulative_rounds || scope.round_number <= 1 {
        return None;
    }

    let mut earlier_rounds: HashMap<Uuid, BTreeSet<i32>> = HashMap::new();
    for score in scores {
        if score.is_completed() && !score.is_jumpoff && score.round_number < scope.round_number {
            earlier_rounds
                .entry(score.startlist_id)
                .or_default()
                .insert(score.round_number);
        }
    }
    let needed = (scope.round_number - 1) as usize;

    Some(
        earlier_rounds
            .into_iter()
            .filter(|(_, rounds)| rounds.len() == needed)
            .map(|(startlist_id, _)| startlist_id)
            .collect(),
    )
}

/// Faults (or points) the entry is judged on in this scope.
fn primary_key(profile: &RuleProfile, score: &Score, all: &[Score], scope: RoundScope) -> Decimal {
    if profile.basis.higher_is_better() {
        return score.points.unwrap_or(Decimal::ZERO);
    }

    if profile.cumulative_rounds && !scope.is_jumpoff {
        return all
            .iter()
            .filter(|s| {
                s.startlist_id == score.startlist_id
                    && s.is_completed()
                    && !s.is_jumpoff
                    && s.round_number <= scope.round_number
            })
            .filter_map(|s| s.total_faults)
            .sum();
    }

    score.total_faults.unwrap_or(Decimal::ZERO)
}

fn deciding_time(profile: &RuleProfile, class: &CompetitionClass, score: &Score) -> Option<Decimal> {
    let final_time = score.final_time?;
    match profile.time_mode {
        TimeMode::Optimum => class.optimum_time.map(|optimum| (final_time - optimum).abs()),
        TimeMode::AgainstClock | TimeMode::TwoPhase | TimeMode::NotAgainstClock => {
            Some(final_time)
        }
    }
}

fn compare_primary(profile: &RuleProfile, a: Decimal, b: Decimal) -> Ordering {
    if profile.basis.higher_is_better() {
        b.cmp(&a)
    } else {
        a.cmp(&b)
    }
}

/// Faster first; a missing time sorts after every recorded one.
fn compare_time(a: Option<Decimal>, b: Option<Decimal>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ranks for an already sorted slice; `level` tells whether two neighbours tie.
fn competition_ranks<T>(sorted: &[T], level: impl Fn(&T, &T) -> bool) -> Vec<i32> {
    let mut ranks: Vec<i32> = Vec::with_capacity(sorted.len());
    for (i, item) in sorted.iter().enumerate() {
        let rank = match i {
            0 => 1,
            _ if level(&sorted[i - 1], item) => ranks[i - 1],
            _ => i as i32 + 1,
        };
        ranks.push(rank);
    }
    ranks
}

/// Aggregates member results per team: in each main round the best
/// [`TEAM_COUNTING_MEMBERS`] results count. Teams with results in more rounds are placed
/// first, then lower faults, then lower counted time.
pub fn team_standings(
    class: &CompetitionClass,
    entries: &[StartlistEntry],
    scores: &[Score],
) -> Vec<TeamStanding> {
    let profile = class.class_rule.profile();
    if !profile.team_aggregate {
        return Vec::new();
    }

    let mut teams: HashMap<&str, Vec<&StartlistEntry>> = HashMap::new();
    for entry in entries {
        if let Some(team) = entry.team_name.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            teams.entry(team).or_default().push(entry);
        }
    }

    let mut standings: Vec<TeamStanding> = teams
        .into_iter()
        .filter_map(|(team_name, members)| {
            let member_ids: BTreeSet<Uuid> = members.iter().map(|m| m.startlist_id).collect();
            let mut total_faults = Decimal::ZERO;
            let mut total_time = Decimal::ZERO;
            let mut rounds_counted = 0;

            for round in 1..=profile.rounds.main_rounds() {
                let mut results: Vec<(Decimal, Decimal)> = scores
                    .iter()
                    .filter(|s| {
                        member_ids.contains(&s.startlist_id)
                            && s.is_completed()
                            && !s.is_jumpoff
                            && s.round_number == round
                    })
                    .map(|s| {
                        (
                            s.total_faults.unwrap_or(Decimal::ZERO),
                            s.final_time.unwrap_or(Decimal::ZERO),
                        )
                    })
                    .collect();
                if results.is_empty() {
                    continue;
                }
                results.sort();
                for (faults, time) in results.into_iter().take(TEAM_COUNTING_MEMBERS) {
                    total_faults += faults;
                    total_time += time;
                }
                rounds_counted += 1;
            }

            (rounds_counted > 0).then(|| TeamStanding {
                rank: 0,
                team_name: team_name.to_string(),
                total_faults,
                total_time,
                rounds_counted,
                members: members.len(),
            })
        })
        .collect();

    standings.sort_by(|a, b| {
        b.rounds_counted
            .cmp(&a.rounds_counted)
            .then_with(|| a.total_faults.cmp(&b.total_faults))
            .then_with(|| a.total_time.cmp(&b.total_time))
            .then_with(|| a.team_name.cmp(&b.team_name))
    });

    let ranks = competition_ranks(&standings, |a, b| {
        a.rounds_counted == b.rounds_counted
            && a.total_faults == b.total_faults
            && a.total_time == b.total_time
    });
    for (standing, rank) in standings.iter_mut().zip(ranks) {
        standing.rank = rank;
    }

    standings
}

/// Recomputes every scope of a class and writes the ranks and qualification flags that
/// changed. Scores without a placing (pending ones) are reset to no rank.
pub async fn rerank_class(store: &dyn CompetitionStore, class_id: Uuid) -> EngineResult<Vec<Placing>> {
    let class = store
        .find_class(class_id)
        .await
        .or_not_found(|| format!("Class {class_id} not found"))?;
    let entries = store.list_startlist(class_id).await?;
    let scores = store.list_class_scores(class_id).await?;

    let scopes: BTreeSet<RoundScope> = scores
        .iter()
        .filter(|s| s.is_completed())
        .map(RoundScope::of)
        .collect();

    let placings: Vec<Placing> = scopes
        .into_iter()
        .flat_map(|scope| rank_scope(&class, &entries, &scores, scope))
        .collect();
    let by_score: HashMap<Uuid, &Placing> = placings.iter().map(|p| (p.score_id, p)).collect();

    let mut written = 0;
    for score in &scores {
        let (rank, qualified) = by_score
            .get(&score.score_id)
            .map(|p| (Some(p.rank), p.qualified_for_jumpoff))
            .unwrap_or((None, false));

        if score.rank != rank || score.qualified_for_jumpoff != qualified {
            store
                .update_score_placing(score.score_id, rank, qualified)
                .await?;
            written += 1;
        }
    }

    debug!(
        class_id = %class_id,
        placings = placings.len(),
        written,
        "Re-ranked class"
    );

    Ok(placings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ClassRule;
    use crate::test_support::{class_with_rule, dec, entry, score_for};

    fn ranks_by_order(placings: &[Placing], entries: &[StartlistEntry]) -> Vec<i32> {
        entries
            .iter()
            .map(|e| {
                placings
                    .iter()
                    .find(|p| p.startlist_id == e.startlist_id)
                    .map(|p| p.rank)
                    .unwrap_or(0)
            })
            .collect()
    }

    const ROUND_ONE: RoundScope = RoundScope {
        round_number: 1,
        is_jumpoff: false,
    };

    const JUMPOFF_ONE: RoundScope = RoundScope {
        round_number: 1,
        is_jumpoff: true,
    };

    fn jumpoff_for(entry: &StartlistEntry, time: &str, faults: &str) -> Score {
        Score {
            is_jumpoff: true,
            ..score_for(entry, 1, time, faults)
        }
    }

    #[test]
    fn test_identical_results_share_rank_and_next_skips() {
        let class = class_with_rule(ClassRule::OneRoundAgainstClock);
        let entries: Vec<_> = (1..=4).map(|i| entry(&class, i, None)).collect();
        let scores = vec![
            score_for(&entries[0], 1, "61.5", "4"),
            score_for(&entries[1], 1, "61.5", "4"),
            score_for(&entries[2], 1, "61.5", "4"),
            score_for(&entries[3], 1, "59.0", "8"),
        ];

        let placings = rank_scope(&class, &entries, &scores, ROUND_ONE);
        assert_eq!(ranks_by_order(&placings, &entries), vec![1, 1, 1, 4]);

        // Ties are listed in running order.
        let listed: Vec<Uuid> = placings.iter().map(|p| p.startlist_id).collect();
        let expected: Vec<Uuid> = entries.iter().map(|e| e.startlist_id).collect();
        assert_eq!(listed, expected);
    }

    #[test]
    fn test_time_separates_equal_faults_against_the_clock() {
        let class = class_with_rule(ClassRule::OneRoundAgainstClock);
        let entries: Vec<_> = (1..=4).map(|i| entry(&class, i, None)).collect();
        let scores = vec![
            score_for(&entries[0], 1, "64.1", "0"),
            score_for(&entries[1], 1, "62.3", "0"),
            score_for(&entries[2], 1, "62.3", "0"),
            score_for(&entries[3], 1, "55.0", "4"),
        ];

        let placings = rank_scope(&class, &entries, &scores, ROUND_ONE);
        assert_eq!(ranks_by_order(&placings, &entries), vec![3, 1, 1, 4]);
        assert!(placings.iter().all(|p| !p.qualified_for_jumpoff));
    }

    #[test]
    fn test_not_against_clock_ties_on_equal_faults() {
        let class = class_with_rule(ClassRule::OneRoundNotAgainstClock);
        let entries: Vec<_> = (1..=3).map(|i| entry(&class, i, None)).collect();
        let scores = vec![
            score_for(&entries[0], 1, "80.0", "0"),
            score_for(&entries[1], 1, "70.0", "0"),
            score_for(&entries[2], 1, "60.0", "4"),
        ];

        let placings = rank_scope(&class, &entries, &scores, ROUND_ONE);
        assert_eq!(ranks_by_order(&placings, &entries), vec![1, 1, 3]);
        assert_eq!(placings[0].startlist_id, entries[0].startlist_id);
    }

    #[test]
    fn test_points_rank_higher_first() {
        let faults_class = class_with_rule(ClassRule::OneRoundAgainstClock);
        let points_class = class_with_rule(ClassRule::Accumulator);
        let entries: Vec<_> = (1..=3).map(|i| entry(&points_class, i, None)).collect();

        let mut scores = vec![
            score_for(&entries[0], 1, "60", "10"),
            score_for(&entries[1], 1, "60", "30"),
            score_for(&entries[2], 1, "60", "20"),
        ];
        for score in &mut scores {
            score.points = score.total_faults;
        }

        let by_points = rank_scope(&points_class, &entries, &scores, ROUND_ONE);
        let by_faults = rank_scope(&faults_class, &entries, &scores, ROUND_ONE);

        assert_eq!(ranks_by_order(&by_points, &entries), vec![3, 1, 2]);
        assert_eq!(ranks_by_order(&by_faults, &entries), vec![1, 3, 2]);
    }

    #[test]
    fn test_clear_leaders_qualify_for_jumpoff() {
        let class = class_with_rule(ClassRule::TwoRoundsWithTiebreaker);
        let entries: Vec<_> = (1..=3).map(|i| entry(&class, i, None)).collect();
        let scores = vec![
            score_for(&entries[0], 1, "70.2", "0"),
            score_for(&entries[1], 1, "68.9", "0"),
            score_for(&entries[2], 1, "65.0", "4"),
        ];

        let placings = rank_scope(&class, &entries, &scores, ROUND_ONE);
        let qualified: Vec<bool> = entries
            .iter()
            .map(|e| {
                placings
                    .iter()
                    .find(|p| p.startlist_id == e.startlist_id)
                    .is_some_and(|p| p.qualified_for_jumpoff)
            })
            .collect();

        assert_eq!(qualified, vec![true, true, false]);
        assert_eq!(ranks_by_order(&placings, &entries), vec![1, 1, 3]);
    }

    #[test]
    fn test_single_leader_does_not_trigger_jumpoff() {
        let class = class_with_rule(ClassRule::OneRoundWithJumpoff);
        let entries: Vec<_> = (1..=2).map(|i| entry(&class, i, None)).collect();
        let scores = vec![
            score_for(&entries[0], 1, "70.2", "0"),
            score_for(&entries[1], 1, "68.9", "4"),
        ];

        let placings = rank_scope(&class, &entries, &scores, ROUND_ONE);
        assert!(placings.iter().all(|p| !p.qualified_for_jumpoff));
    }

    #[test]
    fn test_jumpoff_is_decided_on_time() {
        let class = class_with_rule(ClassRule::OneRoundWithJumpoff);
        let entries: Vec<_> = (1..=2).map(|i| entry(&class, i, None)).collect();
        let mut scores = vec![
            score_for(&entries[0], 1, "71.0", "0"),
            score_for(&entries[1], 1, "69.5", "0"),
        ];
        scores.extend([jumpoff_for(&entries[0], "38.4", "0"), jumpoff_for(&entries[1], "36.9", "0")]);

        let placings = rank_scope(&class, &entries, &scores, JUMPOFF_ONE);
        assert_eq!(ranks_by_order(&placings, &entries), vec![2, 1]);
        assert!(placings.iter().all(|p| !p.qualified_for_jumpoff));
    }

    #[test]
    fn test_jumpoff_only_ranks_current_leaders() {
        let class = class_with_rule(ClassRule::OneRoundWithJumpoff);
        let entries: Vec<_> = (1..=3).map(|i| entry(&class, i, None)).collect();
        // The first rider's round was corrected to four faults after the jump-off was ridden.
        let scores = vec![
            score_for(&entries[0], 1, "70.0", "4"),
            score_for(&entries[1], 1, "71.0", "0"),
            score_for(&entries[2], 1, "72.0", "0"),
            jumpoff_for(&entries[0], "40.0", "0"),
            jumpoff_for(&entries[1], "42.0", "0"),
            jumpoff_for(&entries[2], "43.0", "4"),
        ];

        let placings = rank_scope(&class, &entries, &scores, JUMPOFF_ONE);
        assert_eq!(placings.len(), 2);
        assert_eq!(placings[0].startlist_id, entries[1].startlist_id);
        assert_eq!(placings[0].rank, 1);
        assert_eq!(placings[1].startlist_id, entries[2].startlist_id);
        assert_eq!(placings[1].rank, 2);
    }

    #[test]
    fn test_second_round_needs_a_completed_first_round() {
        let class = class_with_rule(ClassRule::TwoRoundsWithTiebreaker);
        let entries: Vec<_> = (1..=3).map(|i| entry(&class, i, None)).collect();
        let mut pending_first = score_for(&entries[2], 1, "70", "0");
        pending_first.status = crate::models::ScoreStatus::Pending;
        let scores = vec![
            score_for(&entries[0], 1, "70", "8"),
            score_for(&entries[0], 2, "50", "0"),
            score_for(&entries[1], 2, "50", "4"),
            pending_first,
            score_for(&entries[2], 2, "50", "0"),
        ];

        let scope = RoundScope {
            round_number: 2,
            is_jumpoff: false,
        };
        let placings = rank_scope(&class, &entries, &scores, scope);
        assert_eq!(placings.len(), 1);
        assert_eq!(placings[0].startlist_id, entries[0].startlist_id);
        assert_eq!(placings[0].rank, 1);
    }

    #[test]
    fn test_second_round_ranks_on_accumulated_faults() {
        let class = class_with_rule(ClassRule::TwoRoundsWithTiebreaker);
        let entries: Vec<_> = (1..=2).map(|i| entry(&class, i, None)).collect();
        let scores = vec![
            score_for(&entries[0], 1, "70", "0"),
            score_for(&entries[1], 1, "70", "8"),
            score_for(&entries[0], 2, "50", "4"),
            score_for(&entries[1], 2, "50", "0"),
        ];

        let scope = RoundScope {
            round_number: 2,
            is_jumpoff: false,
        };
        let placings = rank_scope(&class, &entries, &scores, scope);
        assert_eq!(ranks_by_order(&placings, &entries), vec![1, 2]);
    }

    #[test]
    fn test_optimum_time_decides_on_closeness() {
        let mut class = class_with_rule(ClassRule::OptimumTime);
        class.optimum_time = Some(dec("70"));
        let entries: Vec<_> = (1..=2).map(|i| entry(&class, i, None)).collect();
        let scores = vec![
            score_for(&entries[0], 1, "69.2", "1"),
            score_for(&entries[1], 1, "70.6", "1"),
        ];

        let placings = rank_scope(&class, &entries, &scores, ROUND_ONE);
        assert_eq!(ranks_by_order(&placings, &entries), vec![2, 1]);
    }

    #[test]
    fn test_pending_scores_are_not_ranked() {
        let class = class_with_rule(ClassRule::OneRoundAgainstClock);
        let entries: Vec<_> = (1..=2).map(|i| entry(&class, i, None)).collect();
        let mut pending = score_for(&entries[1], 1, "60", "0");
        pending.status = crate::models::ScoreStatus::Pending;
        let scores = vec![score_for(&entries[0], 1, "61", "4"), pending];

        let placings = rank_scope(&class, &entries, &scores, ROUND_ONE);
        assert_eq!(placings.len(), 1);
        assert_eq!(placings[0].rank, 1);
    }

    #[test]
    fn test_team_counts_best_three_per_round() {
        let class = class_with_rule(ClassRule::TwoRoundsTeamWithTiebreaker);
        let entries = vec![
            entry(&class, 1, Some("Ireland")),
            entry(&class, 2, Some("Ireland")),
            entry(&class, 3, Some("Ireland")),
            entry(&class, 4, Some("Ireland")),
            entry(&class, 5, Some("Sweden")),
            entry(&class, 6, Some("Sweden")),
            entry(&class, 7, Some("Sweden")),
            entry(&class, 8, None),
        ];
        let scores = vec![
            score_for(&entries[0], 1, "70", "0"),
            score_for(&entries[1], 1, "71", "4"),
            score_for(&entries[2], 1, "72", "0"),
            score_for(&entries[3], 1, "69", "12"),
            score_for(&entries[4], 1, "68", "0"),
            score_for(&entries[5], 1, "69", "4"),
            score_for(&entries[6], 1, "70", "0"),
            score_for(&entries[7], 1, "60", "0"),
        ];

        let standings = team_standings(&class, &entries, &scores);
        assert_eq!(standings.len(), 2);

        // Both teams count 4 faults; the twelve-fault round of Ireland's fourth rider is dropped.
        assert_eq!(standings[0].team_name, "Sweden");
        assert_eq!(standings[0].total_faults, dec("4"));
        assert_eq!(standings[0].total_time, dec("207"));
        assert_eq!(standings[0].rank, 1);

        assert_eq!(standings[1].team_name, "Ireland");
        assert_eq!(standings[1].total_faults, dec("4"));
        assert_eq!(standings[1].total_time, dec("213"));
        assert_eq!(standings[1].members, 4);
        assert_eq!(standings[1].rank, 2);
    }

    #[test]
    fn test_individual_rules_have_no_team_standings() {
        let class = class_with_rule(ClassRule::TwoRoundsWithTiebreaker);
        let entries = vec![entry(&class, 1, Some("Ireland"))];
        let scores = vec![score_for(&entries[0], 1, "70", "0")];
        assert!(team_standings(&class, &entries, &scores).is_empty());
    }
}
