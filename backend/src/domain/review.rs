//! Client reviews of professionals.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Validation errors for review input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewValidationError {
    StarsOutOfRange,
    CommentTooLong { max: usize },
}

impl fmt::Display for ReviewValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StarsOutOfRange => write!(f, "stars must be between 1 and 5"),
            Self::CommentTooLong { max } => write!(f, "comment must be at most {max} characters"),
        }
    }
}

impl std::error::Error for ReviewValidationError {}

/// Star rating between 1 and 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Stars(u8);

impl Stars {
    /// Validate the range.
    pub fn new(value: u8) -> Result<Self, ReviewValidationError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ReviewValidationError::StarsOutOfRange)
        }
    }

    /// Raw value.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<Stars> for u8 {
    fn from(value: Stars) -> Self {
        value.0
    }
}

impl TryFrom<u8> for Stars {
    type Error = ReviewValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum comment length.
pub const REVIEW_COMMENT_MAX: usize = 1000;

/// Free-text comment, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReviewComment(String);

impl ReviewComment {
    /// Trim and bound the comment.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ReviewValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.chars().count() > REVIEW_COMMENT_MAX {
            return Err(ReviewValidationError::CommentTooLong {
                max: REVIEW_COMMENT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ReviewComment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ReviewComment> for String {
    fn from(value: ReviewComment) -> Self {
        value.0
    }
}

impl TryFrom<String> for ReviewComment {
    type Error = ReviewValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Review left by a client for a professional.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub professional_id: UserId,
    pub client_id: UserId,
    pub stars: Stars,
    pub comment: ReviewComment,
    pub created_at: DateTime<Utc>,
}
