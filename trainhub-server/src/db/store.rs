//! Exercise store interface
//!
//! The HTTP layer only ever sees `dyn ExerciseStore`; the concrete backend
//! is picked once at startup and passed down through `AppState`.

use async_trait::async_trait;

use crate::models::{Exercise, ExerciseInput, NewExercise};

/// Primary key constraint on `tags(name)`.
pub const TAG_KEY_CONSTRAINT: &str = "tags_pkey";

/// Primary key constraint on `exercises(id)`.
pub const EXERCISE_KEY_CONSTRAINT: &str = "exercises_pkey";

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    /// Unique or foreign-key constraint breach
    #[error("constraint violation on {constraint}: {message}")]
    Conflict { constraint: String, message: String },

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    pub(crate) fn exercise_not_found(id: &str) -> Self {
        Self::NotFound {
            resource: "exercise",
            id: id.to_owned(),
        }
    }

    /// True when a concurrent writer won the race to insert a tag.
    pub fn is_tag_conflict(&self) -> bool {
        matches!(self, Self::Conflict { constraint, .. } if constraint == TAG_KEY_CONSTRAINT)
    }

    /// True when re-running the whole transaction may succeed.
    ///
    /// Covers tag-key races plus deadlock and serialization aborts.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Sqlx(sqlx::Error::Database(db_err)) => db_err
                .code()
                .is_some_and(|code| RETRYABLE_SQLSTATES.contains(&&*code)),
            _ => self.is_tag_conflict(),
        }
    }
}

/// `deadlock_detected` and `serialization_failure`
const RETRYABLE_SQLSTATES: [&str; 2] = ["40P01", "40001"];

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                return Self::Conflict {
                    constraint: db_err.constraint().unwrap_or("unknown").to_owned(),
                    message: db_err.message().to_owned(),
                };
            }
        }
        Self::Sqlx(err)
    }
}

/// Persistence of exercises, tags, and the association between them.
///
/// # Contract
///
/// - `NotFound` is returned for absent ids on get/update/delete and is
///   never mixed up with a store fault.
/// - Each mutating call commits or rolls back as a unit.
/// - Tags are created on first reference and never deleted.
/// - `list` and `list_all_tag_names` make no ordering promise.
#[async_trait]
pub trait ExerciseStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    /// Cheap round-trip proving the store is reachable.
    async fn ping(&self) -> Result<(), DbError>;

    /// Get one exercise with its tag names.
    async fn get(&self, id: &str) -> Result<Exercise, DbError>;

    /// List every exercise with its tag names, in no particular order.
    async fn list(&self) -> Result<Vec<Exercise>, DbError>;

    /// Insert an exercise, creating any tags it references.
    async fn create(&self, new: &NewExercise) -> Result<Exercise, DbError>;

    /// Replace every field and the whole tag set of an exercise.
    async fn update(&self, id: &str, input: &ExerciseInput) -> Result<Exercise, DbError>;

    /// Delete an exercise and its tag associations. Tags stay.
    async fn delete(&self, id: &str) -> Result<(), DbError>;

    /// Every stored tag name, in no particular order.
    async fn list_all_tag_names(&self) -> Result<Vec<String>, DbError>;
}
