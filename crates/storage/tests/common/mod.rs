#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use storage::{
    CompetitionStore,
    dto::score::SubmitScoreRequest,
    models::{CompetitionClass, EventStatus, Show, ShowType, StartlistEntry},
    rules::ClassRule,
};
use uuid::Uuid;

pub fn dec(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}

pub fn day(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date literal")
}

pub fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::new(
        day(date),
        NaiveTime::parse_from_str(time, "%H:%M").expect("valid time literal"),
    )
}

pub async fn add_show(store: &dyn CompetitionStore, name: &str, start: &str, end: &str) -> Show {
    let created = at("2026-01-01", "00:00");
    store
        .insert_show(&Show {
            show_id: Uuid::new_v4(),
            name: name.to_string(),
            start_date: day(start),
            end_date: day(end),
            show_type: ShowType::National,
            status: EventStatus::Upcoming,
            created_at: created,
            updated_at: created,
        })
        .await
        .expect("show inserted")
}

pub async fn add_class(
    store: &dyn CompetitionStore,
    show: &Show,
    rule: ClassRule,
    date: &str,
    configure: impl FnOnce(&mut CompetitionClass),
) -> CompetitionClass {
    let created = at("2026-01-01", "00:00");
    let mut class = CompetitionClass {
        class_id: Uuid::new_v4(),
        show_id: show.show_id,
        class_name: format!("{rule}"),
        class_rule: rule,
        height: None,
        price: None,
        currency: None,
        class_date: day(date),
        start_time: Some(NaiveTime::from_hms_opt(9, 0, 0).expect("valid time")),
        time_allowed: None,
        time_allowed_round2: None,
        optimum_time: None,
        max_points: None,
        number_of_rounds: rule.profile().rounds.main_rounds(),
        status: EventStatus::Upcoming,
        linked_stream_id: None,
        created_at: created,
        updated_at: created,
    };
    configure(&mut class);
    store.insert_class(&class).await.expect("class inserted")
}

pub async fn add_entry(
    store: &dyn CompetitionStore,
    class: &CompetitionClass,
    start_order: i32,
    rider: &str,
    team: Option<&str>,
) -> StartlistEntry {
    let created = at("2026-01-01", "00:00");
    store
        .insert_entry(&StartlistEntry {
            startlist_id: Uuid::new_v4(),
            class_id: class.class_id,
            rider_name: rider.to_string(),
            rider_external_id: None,
            horse_name: format!("{rider}'s horse"),
            team_name: team.map(str::to_string),
            is_handicap: false,
            country_code: None,
            start_order,
            created_at: created,
            updated_at: created,
        })
        .await
        .expect("entry inserted")
}

pub fn round(
    entry: &StartlistEntry,
    round_number: i32,
    time_taken: &str,
    jumping_faults: &str,
) -> SubmitScoreRequest {
    SubmitScoreRequest {
        startlist_id: Some(entry.startlist_id),
        class_id: Some(entry.class_id),
        round_number,
        is_jumpoff: false,
        time_taken: Some(dec(time_taken)),
        jumping_faults: Some(dec(jumping_faults)),
        points: None,
    }
}

pub fn jumpoff(entry: &StartlistEntry, after_round: i32, time_taken: &str, jumping_faults: &str) -> SubmitScoreRequest {
    SubmitScoreRequest {
        is_jumpoff: true,
        ..round(entry, after_round, time_taken, jumping_faults)
    }
}
