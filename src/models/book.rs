//! Book model and related types
//!
//! A `Book` is the catalog record; physical copies are `BookInstance`s.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::author::Author;
use super::book_instance::BookInstanceDetails;
use super::genre::Genre;

/// Full book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub language: String,
    pub summary: String,
    pub isbn: String,
    /// Nulled out when the referenced author is deleted
    pub author_id: Option<i32>,
}

/// Book with author, genres and copies for the detail page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
    pub copies: Vec<BookInstanceDetails>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 30))]
    pub language: String,
    #[validate(length(max = 1000))]
    pub summary: String,
    #[validate(length(max = 13))]
    pub isbn: String,
    pub author_id: Option<i32>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub language: Option<String>,
    #[validate(length(max = 1000))]
    pub summary: Option<String>,
    #[validate(length(max = 13))]
    pub isbn: Option<String>,
    /// Some(None) clears the author reference, absent leaves it untouched
    #[serde(default, deserialize_with = "deserialize_present")]
    pub author_id: Option<Option<i32>>,
    /// When present, replaces the genre links wholesale
    pub genre_ids: Option<Vec<i32>>,
}

/// Distinguishes an explicit `null` from an absent field
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}
