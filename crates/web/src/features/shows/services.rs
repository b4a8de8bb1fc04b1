use chrono::NaiveDateTime;
use storage::{
    CompetitionStore, EngineError, EngineResult,
    dto::show::{CreateShowRequest, UpdateShowRequest, check_date_range},
    error::NotFoundContext,
    models::{EventStatus, Show, ShowType},
    services::derive_show_status,
};
use uuid::Uuid;

/// List all shows, latest first
pub async fn list_shows(store: &dyn CompetitionStore) -> EngineResult<Vec<Show>> {
    Ok(store.list_shows().await?)
}

pub async fn get_show(store: &dyn CompetitionStore, show_id: Uuid) -> EngineResult<Show> {
    store
        .find_show(show_id)
        .await
        .or_not_found(|| format!("Show {show_id} not found"))
}

/// Create a show; its status is derived from the dates straight away
pub async fn create_show(
    store: &dyn CompetitionStore,
    request: &CreateShowRequest,
    now: NaiveDateTime,
) -> EngineResult<Show> {
    let mut show = Show {
        show_id: Uuid::new_v4(),
        name: request.name.trim().to_string(),
        start_date: request.start_date,
        end_date: request.end_date,
        show_type: request.show_type.parse::<ShowType>()?,
        status: EventStatus::Upcoming,
        created_at: now,
        updated_at: now,
    };
    show.status = derive_show_status(&show, now);

    let created = store.insert_show(&show).await?;
    tracing::info!(show_id = %created.show_id, status = %created.status, "Show created");
    Ok(created)
}

/// Update a show. Changing dates re-derives the status; `cancelled` is final.
pub async fn update_show(
    store: &dyn CompetitionStore,
    show_id: Uuid,
    request: &UpdateShowRequest,
    now: NaiveDateTime,
) -> EngineResult<Show> {
    let mut show = get_show(store, show_id).await?;

    if let Some(name) = &request.name {
        show.name = name.trim().to_string();
    }
    if let Some(start_date) = request.start_date {
        show.start_date = start_date;
    }
    if let Some(end_date) = request.end_date {
        show.end_date = end_date;
    }
    if let Some(show_type) = &request.show_type {
        show.show_type = show_type.parse()?;
    }
    check_date_range(show.start_date, show.end_date)
        .map_err(|e| EngineError::Validation(e.to_string()))?;

    show.status = match &request.status {
        Some(status) => {
            let status: EventStatus = status.parse()?;
            if status != EventStatus::Cancelled {
                return Err(EngineError::Validation(
                    "Only 'cancelled' can be set on a show".to_string(),
                ));
            }
            status
        }
        None => derive_show_status(&show, now),
    };

    Ok(store.update_show(&show).await?)
}

/// Delete a show; refused while it still has classes
pub async fn delete_show(store: &dyn CompetitionStore, show_id: Uuid) -> EngineResult<()> {
    get_show(store, show_id).await?;
    store.delete_show(show_id).await?;
    tracing::info!(show_id = %show_id, "Show deleted");
    Ok(())
}

/// Classes of a show, in schedule order
pub async fn list_show_classes(
    store: &dyn CompetitionStore,
    show_id: Uuid,
) -> EngineResult<Vec<storage::models::CompetitionClass>> {
    get_show(store, show_id).await?;
    Ok(store.list_classes(Some(show_id)).await?)
}
