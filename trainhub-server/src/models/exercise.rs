//! Exercise records and their validated input shapes

use uuid::Uuid;

use super::validation::{check_len, check_no_nul};
use super::{TagSet, ValidationError};

/// Maximum length for exercise ids (a hyphenated UUID)
pub const MAX_ID_LEN: usize = 36;
/// Maximum length for exercise names
pub const MAX_NAME_LEN: usize = 100;
/// Maximum length for instructions
pub const MAX_INSTRUCTIONS_LEN: usize = 2000;
/// Maximum length for enrichment text
pub const MAX_ENRICHMENT_LEN: usize = 1000;
/// Maximum length for video URLs
pub const MAX_VIDEO_URL_LEN: usize = 255;

/// Exercise as stored, with its resolved tag names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub instructions: Option<String>,
    pub enrichment: Option<String>,
    pub video_url: Option<String>,
    pub tags: Vec<String>,
}

/// Validated exercise id.
///
/// Opaque to the server; only needs to be addressable as a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExerciseId(String);

impl ExerciseId {
    /// Validate a caller-supplied id.
    ///
    /// # Example
    /// ```
    /// use trainhub_server::models::ExerciseId;
    ///
    /// assert!(ExerciseId::new("ex1").is_ok());
    /// assert!(ExerciseId::new("a/b").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "id" });
        }
        check_len("id", s, MAX_ID_LEN)?;
        if s.chars().any(|c| c == '/' || c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::InvalidFormat {
                field: "id",
                reason: "must not contain slashes, whitespace or control characters",
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Fresh random id (UUID v4, hyphenated).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ExerciseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated exercise name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseName(String);

impl ExerciseName {
    /// Create a new exercise name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 100 characters
    /// - No NUL characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        check_len("name", trimmed, MAX_NAME_LEN)?;
        check_no_nul("name", trimmed)?;

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Normalise an optional free-text field.
///
/// Absent, empty and whitespace-only values all map to `None`; anything
/// else is kept verbatim after the length check.
fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value {
        Some(s) if !s.trim().is_empty() => {
            check_len(field, s, max)?;
            check_no_nul(field, s)?;
            Ok(Some(s.to_owned()))
        }
        _ => Ok(None),
    }
}

/// Every writable field of an exercise, validated.
///
/// Used for both create and update; update applies it as a full replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseInput {
    pub name: ExerciseName,
    pub instructions: Option<String>,
    pub enrichment: Option<String>,
    pub video_url: Option<String>,
    pub tags: TagSet,
}

impl ExerciseInput {
    pub fn new<S: AsRef<str>>(
        name: &str,
        instructions: Option<&str>,
        enrichment: Option<&str>,
        video_url: Option<&str>,
        tags: &[S],
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: ExerciseName::new(name)?,
            instructions: optional_text("instructions", instructions, MAX_INSTRUCTIONS_LEN)?,
            enrichment: optional_text("enrichment", enrichment, MAX_ENRICHMENT_LEN)?,
            video_url: optional_text("video_url", video_url, MAX_VIDEO_URL_LEN)?,
            tags: TagSet::parse(tags)?,
        })
    }
}

/// Input for a create call: the fields plus the id to store under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    pub id: ExerciseId,
    pub input: ExerciseInput,
}

impl NewExercise {
    /// Use the supplied id, or generate one when the caller omitted it.
    pub fn new(id: Option<&str>, input: ExerciseInput) -> Result<Self, ValidationError> {
        let id = match id {
            Some(id) => ExerciseId::new(id)?,
            None => ExerciseId::generate(),
        };
        Ok(Self { id, input })
    }
}
