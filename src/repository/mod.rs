//! Repository layer for database operations.
//!
//! Each entity has a store trait used by the services and a PostgreSQL
//! implementation. Services only see the traits, so tests can swap in mocks.

pub mod books;
pub mod loans;
pub mod patrons;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, BookInput, Loan, LoanDetails, LoanScope, NewLoan, Patron, PatronInput},
    pagination::PageRequest,
    search::{BookField, LoanField, PatronField, SearchFilter},
};

/// Name of the UNIQUE constraint on `patrons.library_id`
pub const PATRONS_LIBRARY_ID_UNIQUE: &str = "patrons_library_id_unique";
/// Name of the partial unique index allowing one active loan per book
pub const LOANS_ONE_ACTIVE_PER_BOOK: &str = "loans_one_active_per_book";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Book>>;

    /// One page of books matching `filter`, ordered by title, plus the total match count
    async fn search(
        &self,
        filter: &SearchFilter<BookField>,
        page: PageRequest,
    ) -> AppResult<(Vec<Book>, i64)>;

    /// Books without an active loan
    async fn list_available(&self) -> AppResult<Vec<Book>>;

    async fn create(&self, book: &BookInput) -> AppResult<Book>;

    /// `None` when no book has this id
    async fn update(&self, id: i32, book: &BookInput) -> AppResult<Option<Book>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatronStore: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Patron>>;

    async fn search(
        &self,
        filter: &SearchFilter<PatronField>,
        page: PageRequest,
    ) -> AppResult<(Vec<Patron>, i64)>;

    /// Every patron, ordered by last then first name
    async fn list_all(&self) -> AppResult<Vec<Patron>>;

    /// Insert a patron, assigning the next library card number
    async fn create(&self, patron: &PatronInput) -> AppResult<Patron>;

    async fn update(&self, id: i32, patron: &PatronInput) -> AppResult<Option<Patron>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<LoanDetails>>;

    async fn has_active_loan(&self, book_id: i32) -> AppResult<bool>;

    async fn search(
        &self,
        scope: LoanScope,
        filter: &SearchFilter<LoanField>,
        page: PageRequest,
        today: NaiveDate,
    ) -> AppResult<(Vec<LoanDetails>, i64)>;

    async fn create(&self, loan: &NewLoan) -> AppResult<Loan>;

    async fn set_returned_on(&self, id: i32, returned_on: NaiveDate) -> AppResult<Option<Loan>>;
}

/// Main repository struct holding one store per entity
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
    pub patrons: Arc<dyn PatronStore>,
    pub loans: Arc<dyn LoanStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            patrons: Arc::new(patrons::PatronsRepository::new(pool.clone())),
            loans: Arc::new(loans::LoansRepository::new(pool)),
        }
    }

    pub fn from_stores(
        books: Arc<dyn BookStore>,
        patrons: Arc<dyn PatronStore>,
        loans: Arc<dyn LoanStore>,
    ) -> Self {
        Self { books, patrons, loans }
    }
}

/// Whether `err` is a violation of the named constraint or unique index
pub(crate) fn violates(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => db.constraint() == Some(constraint),
        _ => false,
    }
}
