//! Tag name validation and de-duplicated tag sets

use super::validation::{check_len, check_no_nul};
use super::ValidationError;

/// Maximum length for tag names
pub const MAX_TAG_NAME_LEN: usize = 50;

/// Validated tag name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagName(String);

impl TagName {
    /// Create a new tag name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 50 characters
    /// - No NUL characters
    ///
    /// # Example
    /// ```
    /// use trainhub_server::models::TagName;
    ///
    /// assert!(TagName::new("cardio").is_ok());
    /// assert!(TagName::new("  ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "tag" });
        }
        check_len("tag", trimmed, MAX_TAG_NAME_LEN)?;
        check_no_nul("tag", trimmed)?;

        Ok(Self(trimmed.to_owned()))
    }

    /// Get the tag name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Set of tag names attached to one exercise.
///
/// Keeps first-seen order and drops repeats, so binding it to the
/// association table never produces a duplicate pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(Vec<TagName>);

impl TagSet {
    /// Validate every name and collapse duplicates.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self, ValidationError> {
        let mut tags: Vec<TagName> = Vec::with_capacity(names.len());
        for name in names {
            let tag = TagName::new(name.as_ref())?;
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Ok(Self(tags))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagName> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Owned names, ready to bind as a `TEXT[]` parameter.
    pub fn to_names(&self) -> Vec<String> {
        self.0.iter().map(|t| t.as_str().to_owned()).collect()
    }
}
