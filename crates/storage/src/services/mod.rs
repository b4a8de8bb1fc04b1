pub mod lifecycle;
pub mod ranking;
pub mod reconciler;
pub mod scoring;
pub mod standings;

pub use lifecycle::{derive_class_status, derive_show_status, local_now};
pub use ranking::{Placing, RoundScope, TeamStanding, rerank_class};
pub use reconciler::{ReconcileMode, ReconcileReport, StatusChange, reconcile_statuses};
pub use scoring::{delete_score, submit_score};
pub use standings::class_results;
