//! Loans repository for database operations

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{violates, LoanStore, LOANS_ONE_ACTIVE_PER_BOOK};
use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{loan::ALREADY_CHECKED_OUT, Loan, LoanDetails, LoanScope, NewLoan},
    pagination::PageRequest,
    search::{LoanField, SearchFilter},
};

const LOAN_COLUMNS: &str = "id, book_id, patron_id, loaned_on, return_by, returned_on";

const LOAN_DETAILS_COLUMNS: &str = r#"
    l.id, l.book_id, l.patron_id, l.loaned_on, l.return_by, l.returned_on,
    b.title AS book_title,
    p.first_name AS patron_first_name,
    p.last_name AS patron_last_name,
    p.library_id AS patron_library_id
"#;

const LOAN_JOINS: &str = r#"
    FROM loans l
    JOIN books b ON b.id = l.book_id
    JOIN patrons p ON p.id = l.patron_id
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Append the scope restriction to a query that already has a WHERE clause
fn push_scope(builder: &mut QueryBuilder<'_, Postgres>, scope: LoanScope, today: NaiveDate) {
    match scope {
        LoanScope::All => {}
        LoanScope::Active => {
            builder.push(" AND l.returned_on IS NULL");
        }
        LoanScope::Overdue => {
            builder
                .push(" AND l.returned_on IS NULL AND l.return_by < ")
                .push_bind(today);
        }
    }
}

#[async_trait]
impl LoanStore for LoansRepository {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<LoanDetails>> {
        let loan = sqlx::query_as::<_, LoanDetails>(&format!(
            "SELECT {} {} WHERE l.id = $1",
            LOAN_DETAILS_COLUMNS, LOAN_JOINS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(loan)
    }

    async fn has_active_loan(&self, book_id: i32) -> AppResult<bool> {
        let active: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE book_id = $1 AND returned_on IS NULL)",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(active)
    }

    async fn search(
        &self,
        scope: LoanScope,
        filter: &SearchFilter<LoanField>,
        page: PageRequest,
        today: NaiveDate,
    ) -> AppResult<(Vec<LoanDetails>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) {} WHERE 1=1", LOAN_JOINS));
        push_scope(&mut count, scope, today);
        filter.push_and(&mut count);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} {} WHERE 1=1",
            LOAN_DETAILS_COLUMNS, LOAN_JOINS
        ));
        push_scope(&mut select, scope, today);
        filter.push_and(&mut select);
        select
            .push(" ORDER BY l.loaned_on DESC, l.id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let loans = select
            .build_query_as::<LoanDetails>()
            .fetch_all(&self.pool)
            .await?;

        Ok((loans, total))
    }

    async fn create(&self, loan: &NewLoan) -> AppResult<Loan> {
        let created = sqlx::query_as::<_, Loan>(&format!(
            r#"
            INSERT INTO loans (book_id, patron_id, loaned_on, return_by, returned_on)
            VALUES ($1, $2, $3, $4, NULL)
            RETURNING {}
            "#,
            LOAN_COLUMNS
        ))
        .bind(loan.book_id)
        .bind(loan.patron_id)
        .bind(loan.loaned_on)
        .bind(loan.return_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if violates(&err, LOANS_ONE_ACTIVE_PER_BOOK) {
                AppError::Conflict(FieldErrors::single("book_id", ALREADY_CHECKED_OUT))
            } else {
                AppError::Database(err)
            }
        })?;

        Ok(created)
    }

    async fn set_returned_on(&self, id: i32, returned_on: NaiveDate) -> AppResult<Option<Loan>> {
        let updated = sqlx::query_as::<_, Loan>(&format!(
            "UPDATE loans SET returned_on = $1 WHERE id = $2 RETURNING {}",
            LOAN_COLUMNS
        ))
        .bind(returned_on)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }
}
