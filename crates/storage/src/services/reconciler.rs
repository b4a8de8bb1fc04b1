//! Brings stored show and class statuses in line with the schedule.
//!
//! Runs from an external trigger (the CLI under cron, or the HTTP status endpoint). Each
//! entity is written on its own; a failed write is logged, counted and skipped.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use super::lifecycle::{derive_class_status, derive_show_status};
use crate::error::{EngineResult, Result};
use crate::models::EventStatus;
use crate::store::CompetitionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    Apply,
    /// Report what would change without writing anything
    DryRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Show,
    Class,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatusChange {
    pub entity: EntityKind,
    pub id: Uuid,
    pub name: String,
    pub previous_status: EventStatus,
    pub new_status: EventStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ReconcileReport {
    /// Shows and classes looked at
    pub evaluated: usize,
    pub changes: Vec<StatusChange>,
    /// Writes that failed and were skipped
    pub failures: usize,
    pub dry_run: bool,
}

pub async fn reconcile_statuses(
    store: &dyn CompetitionStore,
    now: NaiveDateTime,
    mode: ReconcileMode,
) -> EngineResult<ReconcileReport> {
    let shows = store.list_live_shows().await?;
    let classes = store.list_live_classes().await?;

    let mut report = ReconcileReport {
        evaluated: shows.len() + classes.len(),
        dry_run: mode == ReconcileMode::DryRun,
        ..Default::default()
    };

    let show_changes = shows.iter().map(|show| StatusChange {
        entity: EntityKind::Show,
        id: show.show_id,
        name: show.name.clone(),
        previous_status: show.status,
        new_status: derive_show_status(show, now),
    });
    let class_changes = classes.iter().map(|class| StatusChange {
        entity: EntityKind::Class,
        id: class.class_id,
        name: class.class_name.clone(),
        previous_status: class.status,
        new_status: derive_class_status(class, now),
    });

    for change in show_changes
        .chain(class_changes)
        .filter(|c| c.new_status != c.previous_status)
    {
        if mode == ReconcileMode::Apply {
            if let Err(e) = persist(store, &change).await {
                error!(
                    entity = ?change.entity,
                    id = %change.id,
                    error = %e,
                    "Failed to persist status change"
                );
                report.failures += 1;
                continue;
            }
            info!(
                entity = ?change.entity,
                id = %change.id,
                from = %change.previous_status,
                to = %change.new_status,
                "Status updated"
            );
        }
        report.changes.push(change);
    }

    info!(
        evaluated = report.evaluated,
        changed = report.changes.len(),
        failures = report.failures,
        dry_run = report.dry_run,
        "Status reconciliation finished"
    );

    Ok(report)
}

async fn persist(store: &dyn CompetitionStore, change: &StatusChange) -> Result<()> {
    match change.entity {
        EntityKind::Show => store.update_show_status(change.id, change.new_status).await,
        EntityKind::Class => store.update_class_status(change.id, change.new_status).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;
    use crate::models::{CompetitionClass, Show, ShowType};
    use crate::rules::ClassRule;
    use crate::test_support::{at, class_with_rule, day};

    async fn seeded() -> (InMemoryStore, Show, CompetitionClass) {
        let store = InMemoryStore::new();
        let created = at("2026-04-01", "08:00");
        let show = Show {
            show_id: Uuid::new_v4(),
            name: "Spring Tour".to_string(),
            start_date: day("2026-05-01"),
            end_date: day("2026-05-03"),
            show_type: ShowType::International,
            status: EventStatus::Upcoming,
            created_at: created,
            updated_at: created,
        };
        let class = CompetitionClass {
            show_id: show.show_id,
            ..class_with_rule(ClassRule::OneRoundAgainstClock)
        };
        store.insert_show(&show).await.unwrap();
        store.insert_class(&class).await.unwrap();
        (store, show, class)
    }

    #[tokio::test]
    async fn test_second_run_changes_nothing() {
        let (store, show, class) = seeded().await;
        let now = at("2026-05-02", "10:05");

        let first = reconcile_statuses(&store, now, ReconcileMode::Apply).await.unwrap();
        assert_eq!(first.changes.len(), 2);
        assert_eq!(first.evaluated, 2);
        assert_eq!(
            store.find_show(show.show_id).await.unwrap().status,
            EventStatus::Ongoing
        );
        assert_eq!(
            store.find_class(class.class_id).await.unwrap().status,
            EventStatus::Ongoing
        );

        let second = reconcile_statuses(&store, now, ReconcileMode::Apply).await.unwrap();
        assert!(second.changes.is_empty());
        assert_eq!(second.failures, 0);
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let (store, show, _) = seeded().await;
        let now = at("2026-05-02", "10:05");

        let report = reconcile_statuses(&store, now, ReconcileMode::DryRun).await.unwrap();
        assert!(report.dry_run);
        assert_eq!(report.changes.len(), 2);
        assert_eq!(
            store.find_show(show.show_id).await.unwrap().status,
            EventStatus::Upcoming
        );
    }

    #[tokio::test]
    async fn test_cancelled_entities_are_skipped() {
        let (store, show, class) = seeded().await;
        store
            .update_show_status(show.show_id, EventStatus::Cancelled)
            .await
            .unwrap();
        store
            .update_class_status(class.class_id, EventStatus::Cancelled)
            .await
            .unwrap();

        let report = reconcile_statuses(&store, at("2026-05-02", "12:00"), ReconcileMode::Apply)
            .await
            .unwrap();
        assert_eq!(report.evaluated, 0);
        assert!(report.changes.is_empty());
    }

    #[tokio::test]
    async fn test_report_carries_transition() {
        let (store, show, _) = seeded().await;

        let report = reconcile_statuses(&store, at("2026-05-04", "06:00"), ReconcileMode::Apply)
            .await
            .unwrap();

        // The class is past its date but only an operator completes it.
        assert_eq!(report.changes.len(), 1);
        let change = &report.changes[0];
        assert_eq!(change.entity, EntityKind::Show);
        assert_eq!(change.id, show.show_id);
        assert_eq!(change.previous_status, EventStatus::Upcoming);
        assert_eq!(change.new_status, EventStatus::Completed);
    }
}
