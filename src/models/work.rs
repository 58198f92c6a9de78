//! Work model
//!
//! This module defines the Work entity (a catalog item with a title and a
//! category) and the input validation applied on every create/update path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of work categories, in canonical form.
pub const CATEGORIES: [&str; 3] = ["album", "book", "movie"];

/// Work category.
///
/// Categories are a closed set; parsing is exact and case-sensitive.
/// "album" is a valid category, "Album", "albums", and "albumstrailingtext"
/// are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Album,
    Book,
    Movie,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Album => write!(f, "album"),
            Category::Book => write!(f, "book"),
            Category::Movie => write!(f, "movie"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "album" => Ok(Category::Album),
            "book" => Ok(Category::Book),
            "movie" => Ok(Category::Movie),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

/// Work entity representing a catalog item.
///
/// The vote count is derived from the votes table and never stored here;
/// listings that need it use [`WorkWithVotes`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Work {
    /// Unique identifier
    pub id: i64,
    /// Title (non-empty)
    pub title: String,
    /// Category (album, book, or movie)
    pub category: Category,
    /// Creator (artist, author, or director)
    pub creator: Option<String>,
    /// Year of publication
    pub publication_year: Option<i32>,
    /// Free-form description
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A work together with its derived vote count, for listings and detail
/// pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkWithVotes {
    #[serde(flatten)]
    pub work: Work,
    /// Number of votes cast for this work
    pub vote_count: i64,
}

/// A single validation failure, tied to the input field that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Input for creating or updating a work.
///
/// The category arrives as a raw string so that validation can report it as
/// a field error rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkInput {
    pub title: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
}

impl WorkInput {
    /// Validate the input, returning the parsed category on success.
    ///
    /// Called identically from the create and update paths. Rules:
    /// - title must be present and non-empty after trimming
    /// - category must parse exactly to one of the three enum values
    pub fn validate(&self) -> Result<(String, Category), Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = match &self.title {
            Some(t) if !t.trim().is_empty() => Some(t.trim().to_string()),
            _ => {
                errors.push(FieldError::new("title", "Title cannot be blank"));
                None
            }
        };

        let category = match &self.category {
            Some(c) => match c.parse::<Category>() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    errors.push(FieldError::new(
                        "category",
                        format!(
                            "Category must be one of: {}",
                            CATEGORIES.join(", ")
                        ),
                    ));
                    None
                }
            },
            None => {
                errors.push(FieldError::new(
                    "category",
                    format!("Category must be one of: {}", CATEGORIES.join(", ")),
                ));
                None
            }
        };

        match (title, category) {
            (Some(t), Some(c)) if errors.is_empty() => Ok((t, c)),
            _ => Err(errors),
        }
    }
}
