//! The persistence seam used by every service.
//!
//! [`crate::Database`] implements it on Postgres; [`InMemoryStore`] keeps everything in
//! process for tests and local runs.

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CompetitionClass, EventStatus, Score, Show, StartlistEntry};

pub use memory::InMemoryStore;

#[async_trait]
pub trait CompetitionStore: Send + Sync {
    async fn list_shows(&self) -> Result<Vec<Show>>;
    async fn find_show(&self, show_id: Uuid) -> Result<Show>;
    async fn insert_show(&self, show: &Show) -> Result<Show>;
    async fn update_show(&self, show: &Show) -> Result<Show>;
    async fn update_show_status(&self, show_id: Uuid, status: EventStatus) -> Result<()>;
    /// Fails with `ConstraintViolation` while classes still reference the show
    async fn delete_show(&self, show_id: Uuid) -> Result<()>;
    /// Shows whose status is not `cancelled`
    async fn list_live_shows(&self) -> Result<Vec<Show>>;

    async fn list_classes(&self, show_id: Option<Uuid>) -> Result<Vec<CompetitionClass>>;
    async fn find_class(&self, class_id: Uuid) -> Result<CompetitionClass>;
    async fn insert_class(&self, class: &CompetitionClass) -> Result<CompetitionClass>;
    async fn update_class(&self, class: &CompetitionClass) -> Result<CompetitionClass>;
    async fn update_class_status(&self, class_id: Uuid, status: EventStatus) -> Result<()>;
    /// Removes the class together with its start list and scores
    async fn delete_class(&self, class_id: Uuid) -> Result<()>;
    /// Classes whose status is not `cancelled`
    async fn list_live_classes(&self) -> Result<Vec<CompetitionClass>>;

    /// Entries of a class ordered by `start_order`
    async fn list_startlist(&self, class_id: Uuid) -> Result<Vec<StartlistEntry>>;
    async fn find_entry(&self, startlist_id: Uuid) -> Result<StartlistEntry>;
    async fn insert_entry(&self, entry: &StartlistEntry) -> Result<StartlistEntry>;
    async fn update_entry(&self, entry: &StartlistEntry) -> Result<StartlistEntry>;
    async fn delete_entry(&self, startlist_id: Uuid) -> Result<()>;

    async fn list_class_scores(&self, class_id: Uuid) -> Result<Vec<Score>>;
    async fn find_score(&self, score_id: Uuid) -> Result<Score>;
    async fn find_entry_score(
        &self,
        startlist_id: Uuid,
        round_number: i32,
        is_jumpoff: bool,
    ) -> Result<Option<Score>>;
    /// Inserts or replaces the row for (startlist_id, round_number, is_jumpoff)
    async fn upsert_score(&self, score: &Score) -> Result<Score>;
    async fn update_score_placing(
        &self,
        score_id: Uuid,
        rank: Option<i32>,
        qualified_for_jumpoff: bool,
    ) -> Result<()>;
    async fn delete_score(&self, score_id: Uuid) -> Result<()>;
}
