//! Loan service: checkout, return and scoped listings

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{
        loan::{parse_reference, ALREADY_CHECKED_OUT},
        Book, CheckoutForm, Loan, LoanDetails, LoanScope, NewLoan, Patron,
    },
    pagination::{Page, PageRequest},
    repository::Repository,
    search::loan_filter,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

/// Choices offered by the checkout form
#[derive(Debug, Clone, Default)]
pub struct CheckoutOptions {
    /// Books with no active loan
    pub books: Vec<Book>,
    pub patrons: Vec<Patron>,
}

fn loan_not_found() -> AppError {
    AppError::NotFound("Loan not found".to_string())
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// One page of loans in `scope` matching `search`
    pub async fn list(
        &self,
        scope: LoanScope,
        search: &str,
        page: PageRequest,
        today: NaiveDate,
    ) -> AppResult<Page<LoanDetails>> {
        let filter = loan_filter(search);
        let (loans, total) = self
            .repository
            .loans
            .search(scope, &filter, page, today)
            .await?;
        Ok(Page::new(loans, total, page, search))
    }

    pub async fn checkout_options(&self) -> AppResult<CheckoutOptions> {
        let books = self.repository.books.list_available().await?;
        let patrons = self.repository.patrons.list_all().await?;
        Ok(CheckoutOptions { books, patrons })
    }

    pub async fn get(&self, id: i32) -> AppResult<LoanDetails> {
        self.repository
            .loans
            .get_by_id(id)
            .await?
            .ok_or_else(loan_not_found)
    }

    /// Lend a book to a patron starting `today`.
    ///
    /// Both references are checked before anything is reported, so a form with
    /// two bad fields shows two messages. The active-loan check here gives the
    /// friendly message; the unique index on active loans settles races.
    pub async fn checkout(&self, form: &CheckoutForm, today: NaiveDate) -> AppResult<Loan> {
        let mut errors = FieldErrors::new();

        let book_id = match parse_reference(&form.book_id, "Book ID") {
            Ok(id) => Some(id),
            Err(message) => {
                errors.add("book_id", message);
                None
            }
        };
        let patron_id = match parse_reference(&form.patron_id, "Patron ID") {
            Ok(id) => Some(id),
            Err(message) => {
                errors.add("patron_id", message);
                None
            }
        };

        if let Some(id) = book_id {
            if self.repository.books.get_by_id(id).await?.is_none() {
                errors.add("book_id", "Selected book does not exist.");
            } else if self.repository.loans.has_active_loan(id).await? {
                errors.add("book_id", ALREADY_CHECKED_OUT);
            }
        }
        if let Some(id) = patron_id {
            if self.repository.patrons.get_by_id(id).await?.is_none() {
                errors.add("patron_id", "Selected patron does not exist.");
            }
        }

        errors.into_result().map_err(|err| {
            tracing::debug!(?err, "Checkout rejected");
            err
        })?;

        let (Some(book_id), Some(patron_id)) = (book_id, patron_id) else {
            return Err(AppError::Internal(
                "checkout references missing after validation".to_string(),
            ));
        };

        let new_loan = NewLoan::checkout(book_id, patron_id, today)?;
        let loan = self.repository.loans.create(&new_loan).await?;
        tracing::info!(
            loan_id = loan.id,
            book_id,
            patron_id,
            return_by = %loan.return_by,
            "Book checked out"
        );
        Ok(loan)
    }

    /// Mark a loan returned on `today`
    pub async fn return_loan(&self, id: i32, today: NaiveDate) -> AppResult<Loan> {
        let details = self.get(id).await?;
        if !details.loan.is_active() {
            tracing::warn!(loan_id = id, "Loan returned again, overwriting return date");
        }
        let returned = details.loan.returned(today)?;
        let returned_on = returned.returned_on.unwrap_or(today);

        let loan = self
            .repository
            .loans
            .set_returned_on(id, returned_on)
            .await?
            .ok_or_else(loan_not_found)?;
        tracing::info!(loan_id = loan.id, book_id = loan.book_id, "Book returned");
        Ok(loan)
    }
}
