//! PostgreSQL exercise store
//!
//! - get/list: one query each, tags folded in with LEFT JOIN + ARRAY_AGG
//! - create/update/delete: one transaction per call
//! - tag-key races and deadlock aborts: the whole call is retried once

use std::future::Future;

use async_trait::async_trait;
use sqlx::postgres::PgExecutor;
use sqlx::{FromRow, PgPool};

use super::tags;
use crate::db::{DbError, ExerciseStore};
use crate::models::{Exercise, ExerciseInput, NewExercise};

/// Exercise row with aggregated tag names
#[derive(Debug, FromRow)]
struct ExerciseRow {
    id: String,
    name: String,
    instructions: Option<String>,
    enrichment: Option<String>,
    video_url: Option<String>,
    tags: Vec<String>,
}

impl From<ExerciseRow> for Exercise {
    fn from(r: ExerciseRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            instructions: r.instructions,
            enrichment: r.enrichment,
            video_url: r.video_url,
            tags: r.tags,
        }
    }
}

async fn fetch_exercise<'e, E>(executor: E, id: &str) -> Result<Option<Exercise>, DbError>
where
    E: PgExecutor<'e>,
{
    let row: Option<ExerciseRow> = sqlx::query_as(
        r#"
        SELECT
            e.id,
            e.name,
            e.instructions,
            e.enrichment,
            e.video_url,
            COALESCE(
                ARRAY_AGG(et.tag_name::text ORDER BY et.tag_name)
                    FILTER (WHERE et.tag_name IS NOT NULL),
                '{}'::text[]
            ) AS tags
        FROM exercises e
        LEFT JOIN exercise_tags et ON et.exercise_id = e.id
        WHERE e.id = $1
        GROUP BY e.id
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Exercise::from))
}

/// Run `attempt`, and run it once more if it failed with a retryable error.
///
/// `attempt` must open its own transaction so the first try is fully
/// rolled back before the second starts.
async fn retry_once<T, F, Fut>(op: &'static str, mut attempt: F) -> Result<T, DbError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbError>>,
{
    match attempt().await {
        Err(e) if e.is_retryable() => {
            tracing::warn!(op, error = %e, "transaction aborted by a concurrent writer, retrying once");
            attempt().await
        }
        other => other,
    }
}

/// Exercise store backed by a sqlx connection pool
#[derive(Clone)]
pub struct PgExerciseStore {
    pool: PgPool,
}

impl PgExerciseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn try_create(&self, new: &NewExercise) -> Result<Exercise, DbError> {
        let id = new.id.as_str();
        let input = &new.input;
        let mut tx = self.pool.begin().await?;

        tags::ensure_exist(&mut tx, &input.tags).await?;

        sqlx::query(
            r#"
            INSERT INTO exercises (id, name, instructions, enrichment, video_url)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(input.name.as_str())
        .bind(input.instructions.as_deref())
        .bind(input.enrichment.as_deref())
        .bind(input.video_url.as_deref())
        .execute(&mut *tx)
        .await?;

        tags::attach(&mut tx, id, &input.tags).await?;

        let exercise = fetch_exercise(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::exercise_not_found(id))?;

        tx.commit().await?;
        Ok(exercise)
    }

    async fn try_update(&self, id: &str, input: &ExerciseInput) -> Result<Exercise, DbError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE exercises
            SET name = $2, instructions = $3, enrichment = $4, video_url = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(input.name.as_str())
        .bind(input.instructions.as_deref())
        .bind(input.enrichment.as_deref())
        .bind(input.video_url.as_deref())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::exercise_not_found(id));
        }

        tags::detach_all(&mut tx, id).await?;
        tags::ensure_exist(&mut tx, &input.tags).await?;
        tags::attach(&mut tx, id, &input.tags).await?;

        let exercise = fetch_exercise(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::exercise_not_found(id))?;

        tx.commit().await?;
        Ok(exercise)
    }
}

#[async_trait]
impl ExerciseStore for PgExerciseStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Exercise, DbError> {
        fetch_exercise(&self.pool, id)
            .await?
            .ok_or_else(|| DbError::exercise_not_found(id))
    }

    async fn list(&self) -> Result<Vec<Exercise>, DbError> {
        let rows: Vec<ExerciseRow> = sqlx::query_as(
            r#"
            SELECT
                e.id,
                e.name,
                e.instructions,
                e.enrichment,
                e.video_url,
                COALESCE(
                    ARRAY_AGG(et.tag_name::text ORDER BY et.tag_name)
                        FILTER (WHERE et.tag_name IS NOT NULL),
                    '{}'::text[]
                ) AS tags
            FROM exercises e
            LEFT JOIN exercise_tags et ON et.exercise_id = e.id
            GROUP BY e.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Exercise::from).collect())
    }

    async fn create(&self, new: &NewExercise) -> Result<Exercise, DbError> {
        let exercise = retry_once("create", move || self.try_create(new)).await?;

        tracing::debug!(id = %exercise.id, tags = exercise.tags.len(), "exercise created");
        Ok(exercise)
    }

    async fn update(&self, id: &str, input: &ExerciseInput) -> Result<Exercise, DbError> {
        let exercise = retry_once("update", move || self.try_update(id, input)).await?;

        tracing::debug!(id = %exercise.id, tags = exercise.tags.len(), "exercise updated");
        Ok(exercise)
    }

    async fn delete(&self, id: &str) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let unlinked = tags::detach_all(&mut tx, id).await?;

        let result = sqlx::query("DELETE FROM exercises WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::exercise_not_found(id));
        }

        tx.commit().await?;
        tracing::debug!(id = %id, unlinked, "exercise deleted");
        Ok(())
    }

    async fn list_all_tag_names(&self) -> Result<Vec<String>, DbError> {
        tags::list_names(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::db::{create_pool, migrations};

    // Integration tests - run with DATABASE_URL set
    // cargo test -p trainhub-server -- --ignored

    async fn store() -> PgExerciseStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        PgExerciseStore::new(pool)
    }

    fn unique(prefix: &str) -> String {
        format!("{}-{}", prefix, &uuid::Uuid::new_v4().simple().to_string()[..12])
    }

    fn tag_conflict() -> DbError {
        DbError::Conflict {
            constraint: crate::db::TAG_KEY_CONSTRAINT.into(),
            message: "duplicate key value violates unique constraint".into(),
        }
    }

    #[tokio::test]
    async fn retry_once_recovers_from_tag_conflict() {
        let calls = AtomicUsize::new(0);
        let result = retry_once("create", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(tag_conflict())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retry_once_gives_up_after_second_conflict() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), DbError> = retry_once("update", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(tag_conflict()) }
        })
        .await;

        assert!(result.unwrap_err().is_tag_conflict());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retry_once_does_not_retry_other_errors() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), DbError> = retry_once("create", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(DbError::Conflict {
                    constraint: crate::db::EXERCISE_KEY_CONSTRAINT.into(),
                    message: "duplicate key".into(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(DbError::Conflict { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_rolls_back_on_duplicate_id() {
        let store = store().await;
        let tag = unique("rollback");
        let input = ExerciseInput::new("Squat", None, None, None, &[tag.as_str()]).unwrap();
        let new = NewExercise::new(Some(&unique("dup")), input).unwrap();

        store.create(&new).await.unwrap();
        let err = store.create(&new).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Conflict { ref constraint, .. } if constraint == crate::db::EXERCISE_KEY_CONSTRAINT
        ));

        // The exercise from the first call still has exactly one association
        let ex = store.get(new.id.as_str()).await.unwrap();
        assert_eq!(ex.tags, vec![tag]);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_creates_share_new_tag() {
        let store = store().await;
        let tag = unique("race");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                let tag = tag.clone();
                tokio::spawn(async move {
                    let input = ExerciseInput::new(&format!("Racer {}", i), None, None, None, &[tag])
                        .unwrap();
                    let new = NewExercise::new(None, input).unwrap();
                    store.create(&new).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.expect("task panicked").expect("create failed");
        }

        let names = store.list_all_tag_names().await.unwrap();
        assert_eq!(names.iter().filter(|n| **n == tag).count(), 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_creates_with_opposite_tag_order() {
        let store = store().await;

        for round in 0..20 {
            let tags: Vec<String> = (0..100).map(|i| unique(&format!("order{}", i))).collect();

            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let store = store.clone();
                    let mut tags = tags.clone();
                    if i % 2 == 1 {
                        tags.reverse();
                    }
                    tokio::spawn(async move {
                        let name = format!("Order {} {}", round, i);
                        let input = ExerciseInput::new(&name, None, None, None, &tags).unwrap();
                        let new = NewExercise::new(None, input).unwrap();
                        store.create(&new).await
                    })
                })
                .collect();

            for handle in handles {
                let created = handle.await.expect("task panicked").expect("create failed");
                assert_eq!(created.tags.len(), 100);
            }
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_leaves_no_association_rows() {
        let store = store().await;
        let input = ExerciseInput::new("Lunge", None, None, None, &[unique("legs")]).unwrap();
        let new = NewExercise::new(None, input).unwrap();
        store.create(&new).await.unwrap();

        store.delete(new.id.as_str()).await.unwrap();

        let (links,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM exercise_tags WHERE exercise_id = $1")
                .bind(new.id.as_str())
                .fetch_one(store.pool())
                .await
                .unwrap();
        assert_eq!(links, 0);
    }
}
