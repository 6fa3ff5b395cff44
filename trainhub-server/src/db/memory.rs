//! In-process exercise store
//!
//! Same contract as the PostgreSQL store, kept in three tables behind one
//! `RwLock`: exercise rows, tag names, and `(exercise_id, tag_name)` pairs.
//! Used by tests and by `serve --store memory`. Nothing is persisted.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DbError, ExerciseStore, EXERCISE_KEY_CONSTRAINT};
use crate::models::{Exercise, ExerciseInput, NewExercise, TagSet};

#[derive(Debug, Clone)]
struct ExerciseRow {
    name: String,
    instructions: Option<String>,
    enrichment: Option<String>,
    video_url: Option<String>,
}

impl ExerciseRow {
    fn from_input(input: &ExerciseInput) -> Self {
        Self {
            name: input.name.as_str().to_owned(),
            instructions: input.instructions.clone(),
            enrichment: input.enrichment.clone(),
            video_url: input.video_url.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    exercises: HashMap<String, ExerciseRow>,
    tags: BTreeSet<String>,
    links: BTreeSet<(String, String)>,
}

impl Tables {
    fn materialize(&self, id: &str) -> Option<Exercise> {
        let row = self.exercises.get(id)?;
        let tags = self
            .links
            .range((id.to_owned(), String::new())..)
            .take_while(|(ex, _)| ex == id)
            .map(|(_, tag)| tag.clone())
            .collect();

        Some(Exercise {
            id: id.to_owned(),
            name: row.name.clone(),
            instructions: row.instructions.clone(),
            enrichment: row.enrichment.clone(),
            video_url: row.video_url.clone(),
            tags,
        })
    }

    fn link(&mut self, id: &str, tags: &TagSet) {
        for tag in tags.iter() {
            self.tags.insert(tag.as_str().to_owned());
            self.links.insert((id.to_owned(), tag.as_str().to_owned()));
        }
    }

    fn unlink_all(&mut self, id: &str) {
        self.links.retain(|(ex, _)| ex != id);
    }
}

/// Exercise store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryExerciseStore {
    tables: RwLock<Tables>,
}

impl MemoryExerciseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExerciseStore for MemoryExerciseStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Exercise, DbError> {
        self.tables
            .read()
            .await
            .materialize(id)
            .ok_or_else(|| DbError::exercise_not_found(id))
    }

    async fn list(&self) -> Result<Vec<Exercise>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .exercises
            .keys()
            .filter_map(|id| tables.materialize(id))
            .collect())
    }

    async fn create(&self, new: &NewExercise) -> Result<Exercise, DbError> {
        let id = new.id.as_str();
        let mut tables = self.tables.write().await;

        if tables.exercises.contains_key(id) {
            return Err(DbError::Conflict {
                constraint: EXERCISE_KEY_CONSTRAINT.to_owned(),
                message: format!("exercise '{}' already exists", id),
            });
        }

        tables
            .exercises
            .insert(id.to_owned(), ExerciseRow::from_input(&new.input));
        tables.link(id, &new.input.tags);

        tracing::debug!(id = %id, tags = new.input.tags.len(), "exercise created");
        tables
            .materialize(id)
            .ok_or_else(|| DbError::exercise_not_found(id))
    }

    async fn update(&self, id: &str, input: &ExerciseInput) -> Result<Exercise, DbError> {
        let mut tables = self.tables.write().await;

        let Some(row) = tables.exercises.get_mut(id) else {
            return Err(DbError::exercise_not_found(id));
        };
        *row = ExerciseRow::from_input(input);

        tables.unlink_all(id);
        tables.link(id, &input.tags);

        tracing::debug!(id = %id, tags = input.tags.len(), "exercise updated");
        tables
            .materialize(id)
            .ok_or_else(|| DbError::exercise_not_found(id))
    }

    async fn delete(&self, id: &str) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;

        if tables.exercises.remove(id).is_none() {
            return Err(DbError::exercise_not_found(id));
        }
        tables.unlink_all(id);

        tracing::debug!(id = %id, "exercise deleted");
        Ok(())
    }

    async fn list_all_tag_names(&self) -> Result<Vec<String>, DbError> {
        Ok(self.tables.read().await.tags.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_exercise(id: &str, tags: &[&str]) -> NewExercise {
        let input = ExerciseInput::new("Squat", None, None, None, tags).unwrap();
        NewExercise::new(Some(id), input).unwrap()
    }

    #[tokio::test]
    async fn duplicate_id_is_conflict() {
        let store = MemoryExerciseStore::new();
        store.create(&new_exercise("ex1", &["legs"])).await.unwrap();

        let err = store.create(&new_exercise("ex1", &["arms"])).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));

        // Failed create leaves no trace
        assert_eq!(store.get("ex1").await.unwrap().tags, vec!["legs"]);
        assert_eq!(store.list_all_tag_names().await.unwrap(), vec!["legs"]);
    }

    #[tokio::test]
    async fn materialize_does_not_bleed_between_ids() {
        let store = MemoryExerciseStore::new();
        store.create(&new_exercise("a", &["x"])).await.unwrap();
        store.create(&new_exercise("ab", &["y"])).await.unwrap();
        store.create(&new_exercise("b", &["z"])).await.unwrap();

        assert_eq!(store.get("a").await.unwrap().tags, vec!["x"]);
        assert_eq!(store.get("ab").await.unwrap().tags, vec!["y"]);
        assert_eq!(store.get("b").await.unwrap().tags, vec!["z"]);
    }

    #[tokio::test]
    async fn update_missing_creates_nothing() {
        let store = MemoryExerciseStore::new();
        let input = ExerciseInput::new("Row", None, None, None, &["back"]).unwrap();

        let err = store.update("nope", &input).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert!(store.list_all_tag_names().await.unwrap().is_empty());
    }
}
