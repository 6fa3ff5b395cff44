//! Database layer - store interface, backends, and schema
//!
//! # Design Principles
//!
//! - Handlers hold a `dyn ExerciseStore`, never a pool
//! - List operations fold tags in with JOINs - no N+1 queries
//! - Tags are inserted with ON CONFLICT - no check-then-insert
//! - Transactions for every multi-row mutation

pub mod bootstrap;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod store;

pub use memory::MemoryExerciseStore;
pub use pool::{create_pool, create_pool_with_options};
pub use repos::PgExerciseStore;
pub use store::{DbError, ExerciseStore, EXERCISE_KEY_CONSTRAINT, TAG_KEY_CONSTRAINT};
