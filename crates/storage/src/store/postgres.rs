use async_trait::async_trait;
use uuid::Uuid;

use super::CompetitionStore;
use crate::Database;
use crate::error::Result;
use crate::models::{CompetitionClass, EventStatus, Score, Show, StartlistEntry};
use crate::repository::class::ClassRepository;
use crate::repository::score::ScoreRepository;
use crate::repository::show::ShowRepository;
use crate::repository::startlist::StartlistRepository;

#[async_trait]
impl CompetitionStore for Database {
    async fn list_shows(&self) -> Result<Vec<Show>> {
        ShowRepository::new(self.pool()).list().await
    }

    async fn find_show(&self, show_id: Uuid) -> Result<Show> {
        ShowRepository::new(self.pool()).find_by_id(show_id).await
    }

    async fn insert_show(&self, show: &Show) -> Result<Show> {
        ShowRepository::new(self.pool()).create(show).await
    }

    async fn update_show(&self, show: &Show) -> Result<Show> {
        ShowRepository::new(self.pool()).update(show).await
    }

    async fn update_show_status(&self, show_id: Uuid, status: EventStatus) -> Result<()> {
        ShowRepository::new(self.pool())
            .update_status(show_id, status)
            .await
    }

    async fn delete_show(&self, show_id: Uuid) -> Result<()> {
        ShowRepository::new(self.pool()).delete(show_id).await
    }

    async fn list_live_shows(&self) -> Result<Vec<Show>> {
        ShowRepository::new(self.pool()).list_live().await
    }

    async fn list_classes(&self, show_id: Option<Uuid>) -> Result<Vec<CompetitionClass>> {
        ClassRepository::new(self.pool()).list(show_id).await
    }

    async fn find_class(&self, class_id: Uuid) -> Result<CompetitionClass> {
        ClassRepository::new(self.pool()).find_by_id(class_id).await
    }

    async fn insert_class(&self, class: &CompetitionClass) -> Result<CompetitionClass> {
        ClassRepository::new(self.pool()).create(class).await
    }

    async fn update_class(&self, class: &CompetitionClass) -> Result<CompetitionClass> {
        ClassRepository::new(self.pool()).update(class).await
    }

    async fn update_class_status(&self, class_id: Uuid, status: EventStatus) -> Result<()> {
        ClassRepository::new(self.pool())
            .update_status(class_id, status)
            .await
    }

    async fn delete_class(&self, class_id: Uuid) -> Result<()> {
        ClassRepository::new(self.pool()).delete(class_id).await
    }

    async fn list_live_classes(&self) -> Result<Vec<CompetitionClass>> {
        ClassRepository::new(self.pool()).list_live().await
    }

    async fn list_startlist(&self, class_id: Uuid) -> Result<Vec<StartlistEntry>> {
        StartlistRepository::new(self.pool())
            .list_by_class(class_id)
            .await
    }

    async fn find_entry(&self, startlist_id: Uuid) -> Result<StartlistEntry> {
        StartlistRepository::new(self.pool())
            .find_by_id(startlist_id)
            .await
    }

    async fn insert_entry(&self, entry: &StartlistEntry) -> Result<StartlistEntry> {
        StartlistRepository::new(self.pool()).create(entry).await
    }

    async fn update_entry(&self, entry: &StartlistEntry) -> Result<StartlistEntry> {
        StartlistRepository::new(self.pool()).update(entry).await
    }

    async fn delete_entry(&self, startlist_id: Uuid) -> Result<()> {
        StartlistRepository::new(self.pool())
            .delete(startlist_id)
            .await
    }

    async fn list_class_scores(&self, class_id: Uuid) -> Result<Vec<Score>> {
        ScoreRepository::new(self.pool()).list_by_class(class_id).await
    }

    async fn find_score(&self, score_id: Uuid) -> Result<Score> {
        ScoreRepository::new(self.pool()).find_by_id(score_id).await
    }

    async fn find_entry_score(
        &self,
        startlist_id: Uuid,
        round_number: i32,
        is_jumpoff: bool,
    ) -> Result<Option<Score>> {
        ScoreRepository::new(self.pool())
            .find_for_entry(startlist_id, round_number, is_jumpoff)
            .await
    }

    async fn upsert_score(&self, score: &Score) -> Result<Score> {
        ScoreRepository::new(self.pool()).upsert(score).await
    }

    async fn update_score_placing(
        &self,
        score_id: Uuid,
        rank: Option<i32>,
        qualified_for_jumpoff: bool,
    ) -> Result<()> {
        ScoreRepository::new(self.pool())
            .update_placing(score_id, rank, qualified_for_jumpoff)
            .await
    }

    async fn delete_score(&self, score_id: Uuid) -> Result<()> {
        ScoreRepository::new(self.pool()).delete(score_id).await
    }
}
