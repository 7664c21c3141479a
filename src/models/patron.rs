//! Patron model, library card identifiers and form types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{blank_as_none, validate_form};
use crate::error::AppResult;

/// Prefix shown in front of every library card number
pub const LIBRARY_ID_PREFIX: &str = "MCL";

static ZIP_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("zip code pattern is valid"));

/// Library card number.
///
/// Stored as a plain integer; shown to people as `MCL` followed by the number
/// zero-padded to four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct LibraryId(pub i32);

impl LibraryId {
    /// Number handed to the first patron ever registered
    pub const FIRST: LibraryId = LibraryId(1001);

    /// Next card number given the highest one issued so far
    pub fn next_after(max: Option<LibraryId>) -> LibraryId {
        match max {
            Some(LibraryId(n)) => LibraryId(n + 1),
            None => Self::FIRST,
        }
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for LibraryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:04}", LIBRARY_ID_PREFIX, self.0)
    }
}

/// Read a library card number out of free text.
///
/// Accepts `MCL1001`, `mcl 1001` and a bare `1001`. A bare number must be
/// written exactly as it parses (no sign, no leading zeros).
pub fn extract_library_id(search: &str) -> Option<i32> {
    let upper = search.trim().to_uppercase();

    if let Some(rest) = upper.strip_prefix(LIBRARY_ID_PREFIX) {
        let digits = rest.trim();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        return digits.parse::<i32>().ok();
    }

    super::parse_exact_integer(&upper)
}

/// Patron row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Patron {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub email: String,
    pub library_id: LibraryId,
    pub zip_code: Option<String>,
}

impl Patron {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Validated patron values. The library card number is never part of the
/// input: it is assigned on creation and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatronInput {
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub email: String,
    pub zip_code: Option<String>,
}

/// Patron creation / update form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PatronForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters."))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters."))]
    pub last_name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 100, message = "Address cannot exceed 100 characters."))]
    pub address: Option<String>,
    #[serde(default)]
    #[validate(
        email(message = "Please provide a valid email address."),
        length(max = 100, message = "Email cannot exceed 100 characters.")
    )]
    pub email: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(regex(
        path = *ZIP_CODE_RE,
        message = "Please provide a valid 5 or 9-digit zip code (e.g., 12345 or 12345-6789)."
    ))]
    pub zip_code: Option<String>,
    /// Method override marker (`_method=PUT`) sent by update forms
    #[serde(rename = "_method", default, skip_serializing)]
    pub method: Option<String>,
}

const PATRON_FIELDS: &[&str] = &["first_name", "last_name", "address", "email", "zip_code"];

impl PatronForm {
    /// Check the form and convert it into storable values
    pub fn to_input(&self) -> AppResult<PatronInput> {
        validate_form(
            self,
            PATRON_FIELDS,
            &[
                ("first_name", self.first_name.as_str(), "Please provide a first name."),
                ("last_name", self.last_name.as_str(), "Please provide a last name."),
                ("email", self.email.as_str(), "Please provide an email address."),
            ],
        )?;

        Ok(PatronInput {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            address: self.address.clone(),
            email: self.email.clone(),
            zip_code: self.zip_code.clone(),
        })
    }
}

impl From<&Patron> for PatronForm {
    fn from(patron: &Patron) -> Self {
        Self {
            first_name: patron.first_name.clone(),
            last_name: patron.last_name.clone(),
            address: patron.address.clone(),
            email: patron.email.clone(),
            zip_code: patron.zip_code.clone(),
            method: None,
        }
    }
}
