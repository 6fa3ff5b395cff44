//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod exercise;
pub mod tag;

pub use validation::ValidationError;
pub use exercise::{Exercise, ExerciseId, ExerciseInput, ExerciseName, NewExercise};
pub use tag::{TagName, TagSet};
