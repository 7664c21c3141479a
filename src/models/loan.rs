//! Loan model, checkout/return rules and related types

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::patron::LibraryId;
use crate::error::{AppResult, FieldErrors};

/// Days a patron may keep a book
pub const LOAN_PERIOD_DAYS: i64 = 7;

/// Message reported when a book with an active loan is checked out again
pub const ALREADY_CHECKED_OUT: &str = "Selected book is already checked out";

/// Current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Loan row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: i32,
    pub book_id: i32,
    pub patron_id: i32,
    pub loaned_on: NaiveDate,
    pub return_by: NaiveDate,
    pub returned_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoanStatus {
    Returned,
    Active,
    Overdue,
}

impl LoanStatus {
    pub fn label(self) -> &'static str {
        match self {
            LoanStatus::Returned => "Returned",
            LoanStatus::Active => "Checked out",
            LoanStatus::Overdue => "Overdue",
        }
    }
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.returned_on.is_none()
    }

    /// Active and past its return-by date; a loan due today is not overdue yet
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_active() && self.return_by < today
    }

    pub fn status(&self, today: NaiveDate) -> LoanStatus {
        if !self.is_active() {
            LoanStatus::Returned
        } else if self.is_overdue(today) {
            LoanStatus::Overdue
        } else {
            LoanStatus::Active
        }
    }

    /// The loan as it looks once returned on `today`.
    ///
    /// Returning an already returned loan overwrites the previous date.
    pub fn returned(&self, today: NaiveDate) -> AppResult<Loan> {
        let loan = Loan {
            returned_on: Some(today),
            ..self.clone()
        };
        check_dates(loan.loaned_on, loan.return_by, loan.returned_on)?;
        Ok(loan)
    }
}

/// A loan about to be created by a checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoan {
    pub book_id: i32,
    pub patron_id: i32,
    pub loaned_on: NaiveDate,
    pub return_by: NaiveDate,
}

impl NewLoan {
    /// Loan starting `today`, due back `LOAN_PERIOD_DAYS` later
    pub fn checkout(book_id: i32, patron_id: i32, today: NaiveDate) -> AppResult<Self> {
        let loan = Self {
            book_id,
            patron_id,
            loaned_on: today,
            return_by: today + Duration::days(LOAN_PERIOD_DAYS),
        };
        check_dates(loan.loaned_on, loan.return_by, None)?;
        Ok(loan)
    }
}

/// Date ordering every stored loan must satisfy
pub fn check_dates(
    loaned_on: NaiveDate,
    return_by: NaiveDate,
    returned_on: Option<NaiveDate>,
) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    if return_by < loaned_on {
        errors.add("return_by", "Return-by date cannot be before the loan date.");
    }
    if returned_on.is_some_and(|date| date < loaned_on) {
        errors.add("returned_on", "Returned-on date cannot be before the loan date.");
    }
    errors.into_result()
}

/// Parse a submitted foreign key (`book_id`, `patron_id`)
pub fn parse_reference(raw: &str, label: &str) -> Result<i32, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required.", label));
    }
    let id = trimmed
        .parse::<i64>()
        .map_err(|_| format!("{} must be an integer.", label))?;
    if id < 1 {
        return Err(format!("{} must be a positive integer.", label));
    }
    i32::try_from(id).map_err(|_| format!("{} must be an integer.", label))
}

/// Checkout form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub book_id: String,
    #[serde(default)]
    pub patron_id: String,
}

/// Loan joined with the book and patron it links, for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct LoanDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub loan: Loan,
    pub book_title: String,
    pub patron_first_name: String,
    pub patron_last_name: String,
    pub patron_library_id: LibraryId,
}

impl LoanDetails {
    pub fn patron_name(&self) -> String {
        format!("{} {}", self.patron_first_name, self.patron_last_name)
    }
}

/// Which loans a listing shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanScope {
    All,
    Active,
    Overdue,
}

impl LoanScope {
    pub fn title(self) -> &'static str {
        match self {
            LoanScope::All => "All Loans",
            LoanScope::Active => "Checked Out Books",
            LoanScope::Overdue => "Overdue Books",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            LoanScope::All => "/loans",
            LoanScope::Active => "/loans/active",
            LoanScope::Overdue => "/loans/overdue",
        }
    }

    pub fn includes(self, loan: &Loan, today: NaiveDate) -> bool {
        match self {
            LoanScope::All => true,
            LoanScope::Active => loan.is_active(),
            LoanScope::Overdue => loan.is_overdue(today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(return_by: NaiveDate, returned_on: Option<NaiveDate>) -> Loan {
        Loan {
            id: 1,
            book_id: 2,
            patron_id: 3,
            loaned_on: return_by - Duration::days(LOAN_PERIOD_DAYS),
            return_by,
            returned_on,
        }
    }

    #[test]
    fn test_checkout_due_in_seven_days() {
        for start in [date(2024, 1, 1), date(2024, 2, 25), date(2023, 12, 28)] {
            let new_loan = NewLoan::checkout(4, 5, start).unwrap();
            assert_eq!(new_loan.loaned_on, start);
            assert_eq!(new_loan.return_by, start + Duration::days(7));
        }
        // leap day and year boundary
        assert_eq!(NewLoan::checkout(1, 1, date(2024, 2, 25)).unwrap().return_by, date(2024, 3, 3));
        assert_eq!(NewLoan::checkout(1, 1, date(2023, 12, 28)).unwrap().return_by, date(2024, 1, 4));
    }

    #[test]
    fn test_overdue_is_strictly_after_return_by() {
        let today = date(2024, 5, 10);
        assert!(loan(date(2024, 5, 9), None).is_overdue(today));
        assert!(!loan(date(2024, 5, 10), None).is_overdue(today));
        assert!(!loan(date(2024, 5, 11), None).is_overdue(today));
        assert!(!loan(date(2024, 5, 1), Some(date(2024, 5, 8))).is_overdue(today));
    }

    #[test]
    fn test_status() {
        let today = date(2024, 5, 10);
        assert_eq!(loan(date(2024, 5, 1), None).status(today), LoanStatus::Overdue);
        assert_eq!(loan(date(2024, 5, 12), None).status(today), LoanStatus::Active);
        assert_eq!(
            loan(date(2024, 5, 12), Some(date(2024, 5, 6))).status(today),
            LoanStatus::Returned
        );
    }

    #[test]
    fn test_return_overwrites_previous_date() {
        let first = loan(date(2024, 5, 12), None).returned(date(2024, 5, 8)).unwrap();
        assert_eq!(first.returned_on, Some(date(2024, 5, 8)));
        let second = first.returned(date(2024, 5, 9)).unwrap();
        assert_eq!(second.returned_on, Some(date(2024, 5, 9)));
    }

    #[test]
    fn test_return_before_loan_date_is_rejected() {
        let active = loan(date(2024, 5, 12), None);
        let err = active.returned(date(2024, 5, 1)).unwrap_err();
        assert!(err.field_errors().unwrap().contains("returned_on"));
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(parse_reference("12", "Book ID"), Ok(12));
        assert_eq!(parse_reference(" 12 ", "Book ID"), Ok(12));
        assert_eq!(parse_reference("", "Book ID"), Err("Book ID is required.".to_string()));
        assert_eq!(
            parse_reference("twelve", "Book ID"),
            Err("Book ID must be an integer.".to_string())
        );
        assert_eq!(
            parse_reference("0", "Patron ID"),
            Err("Patron ID must be a positive integer.".to_string())
        );
        assert_eq!(
            parse_reference("-3", "Patron ID"),
            Err("Patron ID must be a positive integer.".to_string())
        );
    }

    #[test]
    fn test_scope_includes() {
        let today = date(2024, 5, 10);
        let overdue = loan(date(2024, 5, 1), None);
        let active = loan(date(2024, 5, 20), None);
        let returned = loan(date(2024, 5, 1), Some(date(2024, 4, 30)));

        assert!(LoanScope::All.includes(&returned, today));
        assert!(LoanScope::Active.includes(&active, today));
        assert!(LoanScope::Active.includes(&overdue, today));
        assert!(!LoanScope::Active.includes(&returned, today));
        assert!(LoanScope::Overdue.includes(&overdue, today));
        assert!(!LoanScope::Overdue.includes(&active, today));
    }
}
