//! PostgreSQL repository implementations
//!
//! Each repository follows these patterns:
//! - Uses JOINs for list operations (no N+1)
//! - Handles conflicts via ON CONFLICT (no check-then-insert)
//! - Uses transactions for multi-step operations

pub mod exercises;
pub(crate) mod tags;

pub use exercises::PgExerciseStore;
