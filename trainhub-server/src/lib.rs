//! trainhub-server: exercise and tag CRUD over HTTP
//!
//! Exercises carry free-form tags through a many-to-many association.
//! Storage sits behind the [`db::ExerciseStore`] trait, with a PostgreSQL
//! backend for real use and an in-memory backend for tests and demos.

pub mod db;
pub mod http;
pub mod models;

pub use db::{DbError, ExerciseStore, MemoryExerciseStore, PgExerciseStore};
pub use http::{build_router, run_server, AppState, ServerConfig};
