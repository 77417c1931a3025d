use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_COMMENT_LENGTH, MAX_FEED_NAME_LENGTH, MAX_FREET_LENGTH, MAX_USERNAME_LENGTH,
};
use crate::error::ValidationError;

/// Reject blank text and text longer than `max` characters.
///
/// Length is counted in characters, not bytes, so multi-byte text is not
/// penalised.
fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Username
// ---------------------------------------------------------------------------

/// A username: non-empty ASCII word characters (`[A-Za-z0-9_]`), at most
/// [`MAX_USERNAME_LENGTH`] long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        check_text("Username", s, MAX_USERNAME_LENGTH)?;
        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ValidationError::InvalidFormat {
                field: "Username",
                reason: "must be a nonempty alphanumeric string",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Freet / comment content
// ---------------------------------------------------------------------------

/// Body text of a freet: not blank, at most [`MAX_FREET_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreetContent(String);

impl FreetContent {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        check_text("Freet content", s, MAX_FREET_LENGTH)?;
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Body text of a comment: not blank, at most [`MAX_COMMENT_LENGTH`]
/// characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentContent(String);

impl CommentContent {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        check_text("Comment content", s, MAX_COMMENT_LENGTH)?;
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Feed name
// ---------------------------------------------------------------------------

/// Name of one of a user's follow-feeds, with surrounding whitespace
/// dropped. The (author, name) pair identifies the feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedName(String);

impl FeedName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        check_text("Feed name", s, MAX_FEED_NAME_LENGTH)?;
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Optional labels
// ---------------------------------------------------------------------------

/// Normalise an optional freet label (topic or country): surrounding
/// whitespace is dropped and blank labels become `None`.
pub fn optional_label(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
