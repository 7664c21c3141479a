//! Patrons repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{violates, PatronStore, PATRONS_LIBRARY_ID_UNIQUE};
use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{LibraryId, Patron, PatronInput},
    pagination::PageRequest,
    search::{PatronField, SearchFilter},
};

const PATRON_COLUMNS: &str = "id, first_name, last_name, address, email, library_id, zip_code";

#[derive(Clone)]
pub struct PatronsRepository {
    pool: Pool<Postgres>,
}

impl PatronsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn library_id_conflict(err: sqlx::Error) -> AppError {
    if violates(&err, PATRONS_LIBRARY_ID_UNIQUE) {
        AppError::Conflict(FieldErrors::single(
            "library_id",
            "This library ID is already in use.",
        ))
    } else {
        AppError::Database(err)
    }
}

#[async_trait]
impl PatronStore for PatronsRepository {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Patron>> {
        let patron = sqlx::query_as::<_, Patron>(&format!(
            "SELECT {} FROM patrons WHERE id = $1",
            PATRON_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(patron)
    }

    async fn search(
        &self,
        filter: &SearchFilter<PatronField>,
        page: PageRequest,
    ) -> AppResult<(Vec<Patron>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM patrons WHERE 1=1");
        filter.push_and(&mut count);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM patrons WHERE 1=1",
            PATRON_COLUMNS
        ));
        filter.push_and(&mut select);
        select
            .push(" ORDER BY last_name ASC, first_name ASC, id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let patrons = select
            .build_query_as::<Patron>()
            .fetch_all(&self.pool)
            .await?;

        Ok((patrons, total))
    }

    async fn list_all(&self) -> AppResult<Vec<Patron>> {
        let patrons = sqlx::query_as::<_, Patron>(&format!(
            "SELECT {} FROM patrons ORDER BY last_name, first_name",
            PATRON_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(patrons)
    }

    async fn create(&self, patron: &PatronInput) -> AppResult<Patron> {
        let mut tx = self.pool.begin().await?;

        // Card numbers are max + 1; hold off concurrent registrations until commit
        sqlx::query("LOCK TABLE patrons IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let max: Option<LibraryId> = sqlx::query_scalar("SELECT MAX(library_id) FROM patrons")
            .fetch_one(&mut *tx)
            .await?;
        let library_id = LibraryId::next_after(max);

        let created = sqlx::query_as::<_, Patron>(&format!(
            r#"
            INSERT INTO patrons (first_name, last_name, address, email, library_id, zip_code)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            PATRON_COLUMNS
        ))
        .bind(&patron.first_name)
        .bind(&patron.last_name)
        .bind(&patron.address)
        .bind(&patron.email)
        .bind(library_id)
        .bind(&patron.zip_code)
        .fetch_one(&mut *tx)
        .await
        .map_err(library_id_conflict)?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update(&self, id: i32, patron: &PatronInput) -> AppResult<Option<Patron>> {
        let updated = sqlx::query_as::<_, Patron>(&format!(
            r#"
            UPDATE patrons
            SET first_name = $1, last_name = $2, address = $3, email = $4, zip_code = $5
            WHERE id = $6
            RETURNING {}
            "#,
            PATRON_COLUMNS
        ))
        .bind(&patron.first_name)
        .bind(&patron.last_name)
        .bind(&patron.address)
        .bind(&patron.email)
        .bind(&patron.zip_code)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }
}
