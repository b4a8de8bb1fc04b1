use chrono::NaiveDateTime;
use storage::{
    CompetitionStore, EngineError, EngineResult,
    directory::RiderDirectory,
    dto::startlist::{CreateStartlistEntryRequest, UpdateStartlistEntryRequest},
    error::NotFoundContext,
    models::{CompetitionClass, StartlistEntry},
};
use uuid::Uuid;

use crate::features::classes::services::get_class;

fn check_handicap(class: &CompetitionClass, is_handicap: bool) -> EngineResult<()> {
    if is_handicap && !class.class_rule.profile().handicap_allowed {
        return Err(EngineError::Validation(format!(
            "Rule {} does not accept handicap entries",
            class.class_rule
        )));
    }
    Ok(())
}

fn normalize_country(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Country from the request, else from the rider directory when the rider is known there
async fn resolve_country(
    directory: &dyn RiderDirectory,
    country_code: Option<&str>,
    rider_external_id: Option<&str>,
) -> Option<String> {
    if let Some(code) = country_code {
        return Some(normalize_country(code));
    }
    match rider_external_id {
        Some(external_id) => directory.lookup_country(external_id).await,
        None => None,
    }
}

/// Entries of a class in running order
pub async fn list_entries(
    store: &dyn CompetitionStore,
    class_id: Uuid,
) -> EngineResult<Vec<StartlistEntry>> {
    get_class(store, class_id).await?;
    Ok(store.list_startlist(class_id).await?)
}

pub async fn get_entry(
    store: &dyn CompetitionStore,
    startlist_id: Uuid,
) -> EngineResult<StartlistEntry> {
    store
        .find_entry(startlist_id)
        .await
        .or_not_found(|| format!("Start list entry {startlist_id} not found"))
}

pub async fn create_entry(
    store: &dyn CompetitionStore,
    directory: &dyn RiderDirectory,
    class_id: Uuid,
    request: &CreateStartlistEntryRequest,
    now: NaiveDateTime,
) -> EngineResult<StartlistEntry> {
    let class = get_class(store, class_id).await?;
    check_handicap(&class, request.is_handicap)?;

    let country_code = resolve_country(
        directory,
        request.country_code.as_deref(),
        request.rider_external_id.as_deref(),
    )
    .await;

    let entry = StartlistEntry {
        startlist_id: Uuid::new_v4(),
        class_id,
        rider_name: request.rider_name.trim().to_string(),
        rider_external_id: request.rider_external_id.clone(),
        horse_name: request.horse_name.trim().to_string(),
        team_name: request.team_name.as_ref().map(|t| t.trim().to_string()),
        is_handicap: request.is_handicap,
        country_code,
        start_order: request.start_order,
        created_at: now,
        updated_at: now,
    };

    let created = store.insert_entry(&entry).await?;
    tracing::info!(
        startlist_id = %created.startlist_id,
        class_id = %class_id,
        start_order = created.start_order,
        "Start list entry created"
    );
    Ok(created)
}

pub async fn update_entry(
    store: &dyn CompetitionStore,
    directory: &dyn RiderDirectory,
    startlist_id: Uuid,
    request: &UpdateStartlistEntryRequest,
) -> EngineResult<StartlistEntry> {
    let mut entry = get_entry(store, startlist_id).await?;
    let class = get_class(store, entry.class_id).await?;

    if let Some(rider_name) = &request.rider_name {
        entry.rider_name = rider_name.trim().to_string();
    }
    if let Some(horse_name) = &request.horse_name {
        entry.horse_name = horse_name.trim().to_string();
    }
    if let Some(team_name) = &request.team_name {
        entry.team_name = Some(team_name.trim().to_string());
    }
    if let Some(is_handicap) = request.is_handicap {
        entry.is_handicap = is_handicap;
    }
    if let Some(start_order) = request.start_order {
        entry.start_order = start_order;
    }
    check_handicap(&class, entry.is_handicap)?;

    let rider_changed = request
        .rider_external_id
        .as_ref()
        .is_some_and(|id| entry.rider_external_id.as_ref() != Some(id));
    if let Some(external_id) = &request.rider_external_id {
        entry.rider_external_id = Some(external_id.clone());
    }

    if let Some(code) = &request.country_code {
        entry.country_code = Some(normalize_country(code));
    } else if rider_changed || entry.country_code.is_none() {
        if let Some(country) =
            resolve_country(directory, None, entry.rider_external_id.as_deref()).await
        {
            entry.country_code = Some(country);
        }
    }

    Ok(store.update_entry(&entry).await?)
}

/// Delete an entry together with its scores; the class is re-ranked afterwards
pub async fn delete_entry(store: &dyn CompetitionStore, startlist_id: Uuid) -> EngineResult<()> {
    let entry = get_entry(store, startlist_id).await?;
    store.delete_entry(startlist_id).await?;
    storage::services::rerank_class(store, entry.class_id).await?;
    tracing::info!(startlist_id = %startlist_id, "Start list entry deleted");
    Ok(())
}
