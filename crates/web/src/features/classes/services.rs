use chrono::NaiveDateTime;
use storage::{
    CompetitionStore, EngineError, EngineResult,
    dto::class::{CreateClassRequest, UpdateClassRequest},
    dto::results::ClassResults,
    error::{NotFoundContext, StorageError},
    models::{CompetitionClass, EventStatus},
    rules::ClassRule,
    services::{RoundScope, class_results, derive_class_status},
};
use uuid::Uuid;

pub async fn list_classes(
    store: &dyn CompetitionStore,
    show_id: Option<Uuid>,
) -> EngineResult<Vec<CompetitionClass>> {
    Ok(store.list_classes(show_id).await?)
}

pub async fn get_class(store: &dyn CompetitionStore, class_id: Uuid) -> EngineResult<CompetitionClass> {
    store
        .find_class(class_id)
        .await
        .or_not_found(|| format!("Class {class_id} not found"))
}

async fn ensure_show_exists(store: &dyn CompetitionStore, show_id: Uuid) -> EngineResult<()> {
    match store.find_show(show_id).await {
        Ok(_) => Ok(()),
        Err(StorageError::NotFound) => Err(EngineError::Validation(format!(
            "Show {show_id} does not exist"
        ))),
        Err(e) => Err(e.into()),
    }
}

fn check_round_count(rule: ClassRule, number_of_rounds: i32) -> EngineResult<()> {
    let profile = rule.profile();
    if profile.accepts_round_count(number_of_rounds) {
        return Ok(());
    }

    Err(EngineError::Validation(format!(
        "Rule {rule} runs {} round(s){}, not {number_of_rounds}",
        profile.rounds.main_rounds(),
        if profile.rounds.allows_jumpoff() {
            " plus an optional jump-off"
        } else {
            ""
        }
    )))
}

/// Create a class; the rule must be in the catalog and the show must exist
pub async fn create_class(
    store: &dyn CompetitionStore,
    request: &CreateClassRequest,
    now: NaiveDateTime,
) -> EngineResult<CompetitionClass> {
    request
        .validate_quantities()
        .map_err(EngineError::Validation)?;

    let class_rule: ClassRule = request.class_rule.parse()?;
    let number_of_rounds = request
        .number_of_rounds
        .unwrap_or_else(|| class_rule.profile().rounds.main_rounds());
    check_round_count(class_rule, number_of_rounds)?;
    ensure_show_exists(store, request.show_id).await?;

    let mut class = CompetitionClass {
        class_id: Uuid::new_v4(),
        show_id: request.show_id,
        class_name: request.class_name.trim().to_string(),
        class_rule,
        height: request.height,
        price: request.price,
        currency: request.currency.as_ref().map(|c| c.to_uppercase()),
        class_date: request.class_date,
        start_time: request.start_time,
        time_allowed: request.time_allowed,
        time_allowed_round2: request.time_allowed_round2,
        optimum_time: request.optimum_time,
        max_points: request.max_points,
        number_of_rounds,
        status: EventStatus::Upcoming,
        linked_stream_id: request.linked_stream_id,
        created_at: now,
        updated_at: now,
    };
    class.status = derive_class_status(&class, now);

    let missing = class_rule.profile().missing_parameters(&class);
    if !missing.is_empty() {
        tracing::warn!(
            class_id = %class.class_id,
            rule = %class_rule,
            missing = ?missing,
            "Class created without the parameters its rule needs for scoring"
        );
    }

    let created = store.insert_class(&class).await?;
    tracing::info!(class_id = %created.class_id, rule = %created.class_rule, "Class created");
    Ok(created)
}

/// Update a class.
///
/// An explicit status follows the transition table (`completed` closes a class). Without
/// one the status is re-derived, so a moved start time can open the class.
pub async fn update_class(
    store: &dyn CompetitionStore,
    class_id: Uuid,
    request: &UpdateClassRequest,
    now: NaiveDateTime,
) -> EngineResult<CompetitionClass> {
    request
        .validate_quantities()
        .map_err(EngineError::Validation)?;

    let current = get_class(store, class_id).await?;
    let mut class = current.clone();

    if let Some(class_name) = &request.class_name {
        class.class_name = class_name.trim().to_string();
    }
    if let Some(rule) = &request.class_rule {
        let rule: ClassRule = rule.parse()?;
        if rule != class.class_rule && request.number_of_rounds.is_none() {
            class.number_of_rounds = rule.profile().rounds.main_rounds();
        }
        class.class_rule = rule;
    }
    if let Some(number_of_rounds) = request.number_of_rounds {
        class.number_of_rounds = number_of_rounds;
    }
    check_round_count(class.class_rule, class.number_of_rounds)?;

    class.height = request.height.or(class.height);
    class.price = request.price.or(class.price);
    if let Some(currency) = &request.currency {
        class.currency = Some(currency.to_uppercase());
    }
    class.class_date = request.class_date.unwrap_or(class.class_date);
    class.start_time = request.start_time.or(class.start_time);
    class.time_allowed = request.time_allowed.or(class.time_allowed);
    class.time_allowed_round2 = request.time_allowed_round2.or(class.time_allowed_round2);
    class.optimum_time = request.optimum_time.or(class.optimum_time);
    class.max_points = request.max_points.or(class.max_points);
    class.linked_stream_id = request.linked_stream_id.or(class.linked_stream_id);

    if changes_scoring(&current, &class) && !store.list_class_scores(class_id).await?.is_empty() {
        return Err(EngineError::Validation(format!(
            "Class '{}' already has scores; its rule, rounds and timing cannot change",
            current.class_name
        )));
    }

    class.status = match &request.status {
        Some(status) => {
            let next: EventStatus = status.parse()?;
            if !class.status.can_transition_to(next) {
                return Err(EngineError::Validation(format!(
                    "Class status cannot change from {} to {next}",
                    class.status
                )));
            }
            next
        }
        None => derive_class_status(&class, now),
    };

    let updated = store.update_class(&class).await?;
    tracing::info!(class_id = %class_id, status = %updated.status, "Class updated");
    Ok(updated)
}

/// Whether the edit touches anything a stored score was computed from.
fn changes_scoring(current: &CompetitionClass, updated: &CompetitionClass) -> bool {
    current.class_rule != updated.class_rule
        || current.number_of_rounds != updated.number_of_rounds
        || current.time_allowed != updated.time_allowed
        || current.time_allowed_round2 != updated.time_allowed_round2
        || current.optimum_time != updated.optimum_time
        || current.max_points != updated.max_points
}

/// Delete a class together with its start list and scores
pub async fn delete_class(store: &dyn CompetitionStore, class_id: Uuid) -> EngineResult<()> {
    get_class(store, class_id).await?;
    store.delete_class(class_id).await?;
    tracing::info!(class_id = %class_id, "Class deleted");
    Ok(())
}

pub async fn get_results(
    store: &dyn CompetitionStore,
    class_id: Uuid,
    scope: RoundScope,
) -> EngineResult<ClassResults> {
    if scope.round_number < 1 {
        return Err(EngineError::Validation("round must be >= 1".to_string()));
    }
    class_results(store, class_id, scope).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;
    use storage::{
        InMemoryStore,
        dto::score::SubmitScoreRequest,
        models::{Show, ShowType, StartlistEntry},
        services::submit_score,
    };

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 2)
            .and_then(|d| d.and_hms_opt(11, 0, 0))
            .unwrap()
    }

    async fn scored_class() -> (InMemoryStore, CompetitionClass) {
        let store = InMemoryStore::new();
        let show = store
            .insert_show(&Show {
                show_id: Uuid::new_v4(),
                name: "Spring Tour".to_string(),
                start_date: now().date(),
                end_date: now().date(),
                show_type: ShowType::National,
                status: EventStatus::Ongoing,
                created_at: now(),
                updated_at: now(),
            })
            .await
            .unwrap();
        let class = store
            .insert_class(&CompetitionClass {
                class_id: Uuid::new_v4(),
                show_id: show.show_id,
                class_name: "1.20m Speed".to_string(),
                class_rule: ClassRule::OneRoundAgainstClock,
                height: None,
                price: None,
                currency: None,
                class_date: now().date(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0),
                time_allowed: Some(Decimal::from(60)),
                time_allowed_round2: None,
                optimum_time: None,
                max_points: None,
                number_of_rounds: 1,
                status: EventStatus::Ongoing,
                linked_stream_id: None,
                created_at: now(),
                updated_at: now(),
            })
            .await
            .unwrap();
        let entry = store
            .insert_entry(&StartlistEntry {
                startlist_id: Uuid::new_v4(),
                class_id: class.class_id,
                rider_name: "Ann".to_string(),
                rider_external_id: None,
                horse_name: "Comet".to_string(),
                team_name: None,
                is_handicap: false,
                country_code: None,
                start_order: 1,
                created_at: now(),
                updated_at: now(),
            })
            .await
            .unwrap();
        submit_score(
            &store,
            &SubmitScoreRequest {
                startlist_id: Some(entry.startlist_id),
                class_id: Some(class.class_id),
                round_number: 1,
                is_jumpoff: false,
                time_taken: Some(Decimal::from(58)),
                jumping_faults: Some(Decimal::from(4)),
                points: None,
            },
            now(),
        )
        .await
        .unwrap();
        (store, class)
    }

    #[tokio::test]
    async fn test_scored_class_keeps_its_rule_and_timing() {
        let (store, class) = scored_class().await;

        let rule_change = UpdateClassRequest {
            class_rule: Some("accumulator".to_string()),
            max_points: Some(Decimal::from(65)),
            ..Default::default()
        };
        let err = update_class(&store, class.class_id, &rule_change, now())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        let timing_change = UpdateClassRequest {
            time_allowed: Some(Decimal::from(55)),
            ..Default::default()
        };
        assert!(matches!(
            update_class(&store, class.class_id, &timing_change, now()).await,
            Err(EngineError::Validation(_))
        ));

        let stored = store.find_class(class.class_id).await.unwrap();
        assert_eq!(stored.class_rule, ClassRule::OneRoundAgainstClock);
        assert_eq!(stored.time_allowed, Some(Decimal::from(60)));
    }

    #[tokio::test]
    async fn test_scored_class_accepts_other_edits() {
        let (store, class) = scored_class().await;

        let rename = UpdateClassRequest {
            class_name: Some("1.20m Speed Final".to_string()),
            time_allowed: Some(Decimal::from(60)),
            ..Default::default()
        };
        let updated = update_class(&store, class.class_id, &rename, now())
            .await
            .unwrap();
        assert_eq!(updated.class_name, "1.20m Speed Final");
    }
}
