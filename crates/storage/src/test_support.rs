use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{CompetitionClass, EventStatus, Score, ScoreStatus, StartlistEntry};
use crate::rules::ClassRule;

pub fn dec(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}

pub fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::new(day(date), hm(time))
}

pub fn day(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date literal")
}

pub fn hm(time: &str) -> NaiveTime {
    NaiveTime::parse_from_str(time, "%H:%M").expect("valid time literal")
}

pub fn class_with_rule(rule: ClassRule) -> CompetitionClass {
    let created = at("2026-05-01", "08:00");
    CompetitionClass {
        class_id: Uuid::new_v4(),
        show_id: Uuid::new_v4(),
        class_name: format!("{rule} 1.30m"),
        class_rule: rule,
        height: Some(dec("130")),
        price: None,
        currency: None,
        class_date: day("2026-05-02"),
        start_time: Some(hm("10:00")),
        time_allowed: None,
        time_allowed_round2: None,
        optimum_time: None,
        max_points: None,
        number_of_rounds: rule.profile().rounds.main_rounds(),
        status: EventStatus::Upcoming,
        linked_stream_id: None,
        created_at: created,
        updated_at: created,
    }
}

pub fn entry(class: &CompetitionClass, start_order: i32, team: Option<&str>) -> StartlistEntry {
    let created = at("2026-05-01", "08:00");
    StartlistEntry {
        startlist_id: Uuid::new_v4(),
        class_id: class.class_id,
        rider_name: format!("Rider {start_order}"),
        rider_external_id: None,
        horse_name: format!("Horse {start_order}"),
        team_name: team.map(str::to_string),
        is_handicap: false,
        country_code: None,
        start_order,
        created_at: created,
        updated_at: created,
    }
}

/// A completed fault-based score with no time faults.
pub fn completed_score(class: &CompetitionClass, round: i32, time: &str, faults: &str) -> Score {
    let created = at("2026-05-02", "10:00");
    Score {
        score_id: Uuid::new_v4(),
        startlist_id: Uuid::new_v4(),
        class_id: class.class_id,
        round_number: round,
        is_jumpoff: false,
        time_taken: Some(dec(time)),
        time_faults: Some(Decimal::ZERO),
        jumping_faults: Some(dec(faults)),
        total_faults: Some(dec(faults)),
        points: None,
        final_time: Some(dec(time)),
        status: ScoreStatus::Completed,
        qualified_for_jumpoff: false,
        rank: None,
        scored_at: Some(created),
        created_at: created,
        updated_at: created,
    }
}

pub fn score_for(entry: &StartlistEntry, round: i32, time: &str, faults: &str) -> Score {
    let mut score = completed_score(&class_stub(entry.class_id), round, time, faults);
    score.startlist_id = entry.startlist_id;
    score
}

fn class_stub(class_id: Uuid) -> CompetitionClass {
    CompetitionClass {
        class_id,
        ..class_with_rule(ClassRule::OneRoundAgainstClock)
    }
}
