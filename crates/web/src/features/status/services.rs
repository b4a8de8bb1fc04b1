use chrono::NaiveDateTime;
use storage::{
    CompetitionStore, EngineResult,
    services::{ReconcileMode, ReconcileReport, reconcile_statuses},
};

pub async fn reconcile(
    store: &dyn CompetitionStore,
    now: NaiveDateTime,
    dry_run: bool,
) -> EngineResult<ReconcileReport> {
    let mode = if dry_run {
        ReconcileMode::DryRun
    } else {
        ReconcileMode::Apply
    };

    reconcile_statuses(store, now, mode).await
}
