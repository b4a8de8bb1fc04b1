use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::CompetitionStore;
use crate::error::{Result, StorageError};
use crate::models::{CompetitionClass, EventStatus, Score, Show, StartlistEntry};

#[derive(Default)]
struct Tables {
    shows: HashMap<Uuid, Show>,
    classes: HashMap<Uuid, CompetitionClass>,
    entries: HashMap<Uuid, StartlistEntry>,
    scores: HashMap<Uuid, Score>,
}

impl Tables {
    fn check_start_order(&self, entry: &StartlistEntry) -> Result<()> {
        let taken = self.entries.values().any(|other| {
            other.class_id == entry.class_id
                && other.start_order == entry.start_order
                && other.startlist_id != entry.startlist_id
        });
        if taken {
            return Err(StorageError::ConstraintViolation(format!(
                "Start order {} is already taken in this class",
                entry.start_order
            )));
        }
        Ok(())
    }

    fn remove_entry_scores(&mut self, startlist_id: Uuid) {
        self.scores.retain(|_, score| score.startlist_id != startlist_id);
    }
}

/// Process-local store with the same constraints as the Postgres schema.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> chrono::NaiveDateTime {
    Utc::now().naive_utc()
}

fn sorted_by<T, K: Ord>(mut rows: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    rows.sort_by_key(key);
    rows
}

#[async_trait]
impl CompetitionStore for InMemoryStore {
    async fn list_shows(&self) -> Result<Vec<Show>> {
        let tables = self.tables.read().await;
        let shows = tables.shows.values().cloned().collect();
        Ok(sorted_by(shows, |s: &Show| (std::cmp::Reverse(s.start_date), s.show_id)))
    }

    async fn find_show(&self, show_id: Uuid) -> Result<Show> {
        let tables = self.tables.read().await;
        tables.shows.get(&show_id).cloned().ok_or(StorageError::NotFound)
    }

    async fn insert_show(&self, show: &Show) -> Result<Show> {
        let mut tables = self.tables.write().await;
        if tables.shows.contains_key(&show.show_id) {
            return Err(StorageError::ConstraintViolation(
                "Show already exists".to_string(),
            ));
        }
        let mut stored = show.clone();
        stored.updated_at = now();
        tables.shows.insert(stored.show_id, stored.clone());
        Ok(stored)
    }

    async fn update_show(&self, show: &Show) -> Result<Show> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .shows
            .get_mut(&show.show_id)
            .ok_or(StorageError::NotFound)?;
        let created_at = existing.created_at;
        *existing = show.clone();
        existing.created_at = created_at;
        existing.updated_at = now();
        Ok(existing.clone())
    }

    async fn update_show_status(&self, show_id: Uuid, status: EventStatus) -> Result<()> {
        let mut tables = self.tables.write().await;
        let show = tables.shows.get_mut(&show_id).ok_or(StorageError::NotFound)?;
        show.status = status;
        show.updated_at = now();
        Ok(())
    }

    async fn delete_show(&self, show_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.classes.values().any(|c| c.show_id == show_id) {
            return Err(StorageError::ConstraintViolation(
                "Show still has classes".to_string(),
            ));
        }
        tables
            .shows
            .remove(&show_id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    async fn list_live_shows(&self) -> Result<Vec<Show>> {
        let shows = self.list_shows().await?;
        Ok(shows
            .into_iter()
            .filter(|s| s.status != EventStatus::Cancelled)
            .collect())
    }

    async fn list_classes(&self, show_id: Option<Uuid>) -> Result<Vec<CompetitionClass>> {
        let tables = self.tables.read().await;
        let classes = tables
            .classes
            .values()
            .filter(|c| show_id.is_none_or(|id| c.show_id == id))
            .cloned()
            .collect();
        Ok(sorted_by(classes, |c: &CompetitionClass| {
            (c.class_date, c.start_time, c.class_id)
        }))
    }

    async fn find_class(&self, class_id: Uuid) -> Result<CompetitionClass> {
        let tables = self.tables.read().await;
        tables
            .classes
            .get(&class_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn insert_class(&self, class: &CompetitionClass) -> Result<CompetitionClass> {
        let mut tables = self.tables.write().await;
        if !tables.shows.contains_key(&class.show_id) {
            return Err(StorageError::ConstraintViolation(
                "Show does not exist".to_string(),
            ));
        }
        let mut stored = class.clone();
        stored.updated_at = now();
        tables.classes.insert(stored.class_id, stored.clone());
        Ok(stored)
    }

    async fn update_class(&self, class: &CompetitionClass) -> Result<CompetitionClass> {
        let mut tables = self.tables.write().await;
        if !tables.shows.contains_key(&class.show_id) {
            return Err(StorageError::ConstraintViolation(
                "Show does not exist".to_string(),
            ));
        }
        let existing = tables
            .classes
            .get_mut(&class.class_id)
            .ok_or(StorageError::NotFound)?;
        let created_at = existing.created_at;
        *existing = class.clone();
        existing.created_at = created_at;
        existing.updated_at = now();
        Ok(existing.clone())
    }

    async fn update_class_status(&self, class_id: Uuid, status: EventStatus) -> Result<()> {
        let mut tables = self.tables.write().await;
        let class = tables
            .classes
            .get_mut(&class_id)
            .ok_or(StorageError::NotFound)?;
        class.status = status;
        class.updated_at = now();
        Ok(())
    }

    async fn delete_class(&self, class_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .classes
            .remove(&class_id)
            .ok_or(StorageError::NotFound)?;
        tables.entries.retain(|_, e| e.class_id != class_id);
        tables.scores.retain(|_, s| s.class_id != class_id);
        Ok(())
    }

    async fn list_live_classes(&self) -> Result<Vec<CompetitionClass>> {
        let classes = self.list_classes(None).await?;
        Ok(classes
            .into_iter()
            .filter(|c| c.status != EventStatus::Cancelled)
            .collect())
    }

    async fn list_startlist(&self, class_id: Uuid) -> Result<Vec<StartlistEntry>> {
        let tables = self.tables.read().await;
        let entries = tables
            .entries
            .values()
            .filter(|e| e.class_id == class_id)
            .cloned()
            .collect();
        Ok(sorted_by(entries, |e: &StartlistEntry| e.start_order))
    }

    async fn find_entry(&self, startlist_id: Uuid) -> Result<StartlistEntry> {
        let tables = self.tables.read().await;
        tables
            .entries
            .get(&startlist_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn insert_entry(&self, entry: &StartlistEntry) -> Result<StartlistEntry> {
        let mut tables = self.tables.write().await;
        if !tables.classes.contains_key(&entry.class_id) {
            return Err(StorageError::ConstraintViolation(
                "Class does not exist".to_string(),
            ));
        }
        tables.check_start_order(entry)?;
        let mut stored = entry.clone();
        stored.updated_at = now();
        tables.entries.insert(stored.startlist_id, stored.clone());
        Ok(stored)
    }

    async fn update_entry(&self, entry: &StartlistEntry) -> Result<StartlistEntry> {
        let mut tables = self.tables.write().await;
        tables.check_start_order(entry)?;
        let existing = tables
            .entries
            .get_mut(&entry.startlist_id)
            .ok_or(StorageError::NotFound)?;
        let created_at = existing.created_at;
        *existing = entry.clone();
        existing.created_at = created_at;
        existing.updated_at = now();
        Ok(existing.clone())
    }

    async fn delete_entry(&self, startlist_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .entries
            .remove(&startlist_id)
            .ok_or(StorageError::NotFound)?;
        tables.remove_entry_scores(startlist_id);
        Ok(())
    }

    async fn list_class_scores(&self, class_id: Uuid) -> Result<Vec<Score>> {
        let tables = self.tables.read().await;
        let scores = tables
            .scores
            .values()
            .filter(|s| s.class_id == class_id)
            .cloned()
            .collect();
        Ok(sorted_by(scores, |s: &Score| {
            (s.round_number, s.is_jumpoff, s.rank, s.score_id)
        }))
    }

    async fn find_score(&self, score_id: Uuid) -> Result<Score> {
        let tables = self.tables.read().await;
        tables
            .scores
            .get(&score_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn find_entry_score(
        &self,
        startlist_id: Uuid,
        round_number: i32,
        is_jumpoff: bool,
    ) -> Result<Option<Score>> {
        let tables = self.tables.read().await;
        Ok(tables
            .scores
            .values()
            .find(|s| {
                s.startlist_id == startlist_id
                    && s.round_number == round_number
                    && s.is_jumpoff == is_jumpoff
            })
            .cloned())
    }

    async fn upsert_score(&self, score: &Score) -> Result<Score> {
        let mut tables = self.tables.write().await;
        if !tables.entries.contains_key(&score.startlist_id) {
            return Err(StorageError::ConstraintViolation(
                "Start list entry does not exist".to_string(),
            ));
        }

        let mut stored = score.clone();
        let existing_id = tables
            .scores
            .values()
            .find(|s| {
                s.startlist_id == score.startlist_id
                    && s.round_number == score.round_number
                    && s.is_jumpoff == score.is_jumpoff
            })
            .map(|s| (s.score_id, s.created_at));
        if let Some((score_id, created_at)) = existing_id {
            tables.scores.remove(&score_id);
            stored.score_id = score_id;
            stored.created_at = created_at;
        }
        stored.updated_at = now();
        tables.scores.insert(stored.score_id, stored.clone());
        Ok(stored)
    }

    async fn update_score_placing(
        &self,
        score_id: Uuid,
        rank: Option<i32>,
        qualified_for_jumpoff: bool,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let score = tables
            .scores
            .get_mut(&score_id)
            .ok_or(StorageError::NotFound)?;
        score.rank = rank;
        score.qualified_for_jumpoff = qualified_for_jumpoff;
        score.updated_at = now();
        Ok(())
    }

    async fn delete_score(&self, score_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .scores
            .remove(&score_id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}
