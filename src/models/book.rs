//! Book model and form types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use super::{blank_as_none, parse_exact_integer, validate_form};
use crate::error::AppResult;

/// Book row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub first_published: Option<i32>,
}

/// Validated values ready to be written to the `books` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub first_published: Option<i32>,
}

/// Book creation / update form, as submitted by the browser
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BookForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(custom(function = "integer_year", message = "First published must be a whole number (e.g., 1965)."))]
    pub first_published: Option<String>,
    /// Method override marker (`_method=PUT`) sent by update forms
    #[serde(rename = "_method", default, skip_serializing)]
    pub method: Option<String>,
}

const BOOK_FIELDS: &[&str] = &["title", "author", "genre", "first_published"];

fn integer_year(value: &str) -> Result<(), ValidationError> {
    parse_exact_integer(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("integer"))
}

impl BookForm {
    /// Check the form and convert it into storable values
    pub fn to_input(&self) -> AppResult<BookInput> {
        validate_form(
            self,
            BOOK_FIELDS,
            &[
                ("title", self.title.as_str(), "Title is required and cannot be empty."),
                ("author", self.author.as_str(), "Author is required and cannot be empty."),
            ],
        )?;

        Ok(BookInput {
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre.clone(),
            first_published: self.first_published.as_deref().and_then(parse_exact_integer),
        })
    }
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            first_published: book.first_published.map(|year| year.to_string()),
            method: None,
        }
    }
}
