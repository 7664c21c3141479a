//! Data models for the library manager

pub mod book;
pub mod loan;
pub mod patron;

// Re-export commonly used types
pub use book::{Book, BookForm, BookInput};
pub use loan::{CheckoutForm, Loan, LoanDetails, LoanScope, LoanStatus, NewLoan};
pub use patron::{LibraryId, Patron, PatronForm, PatronInput};

use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

use crate::error::{AppResult, FieldErrors};

/// Deserialize a form field, treating a blank value as absent
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Rejects empty and whitespace-only strings
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// A required text field: name, submitted value, message shown when left blank
pub type Required<'a> = (&'static str, &'a str, &'static str);

/// Check a form and report failures field by field, in `field_order`.
///
/// A blank required field reports its own message and hides any other rule
/// on that field; otherwise the first `validator` failure is used.
pub fn validate_form<T: Validate>(
    form: &T,
    field_order: &[&str],
    required: &[Required<'_>],
) -> AppResult<()> {
    let failures = form.validate().err();
    let by_field = failures
        .as_ref()
        .map(|errors| errors.field_errors())
        .unwrap_or_default();

    let mut errors = FieldErrors::new();
    for field in field_order {
        let blank = required
            .iter()
            .find(|(name, value, _)| name == field && not_blank(value).is_err());
        if let Some((_, _, message)) = blank {
            errors.add(field, *message);
            continue;
        }

        if let Some(first) = by_field.get(*field).and_then(|errs| errs.first()) {
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid.", field));
            errors.add(field, message);
        }
    }

    errors.into_result().map_err(|err| {
        tracing::debug!(?err, "Form rejected");
        err
    })
}

/// Strict integer parse: the value must read back as exactly the same text.
///
/// `"1999"` parses, `" 1999 "` parses, `"01999"`, `"19x"` and `"+5"` do not.
pub fn parse_exact_integer(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    let parsed = trimmed.parse::<i32>().ok()?;
    (parsed.to_string() == trimmed).then_some(parsed)
}
