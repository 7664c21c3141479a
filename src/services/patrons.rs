//! Patron registry service

use crate::{
    error::{AppError, AppResult},
    models::{Patron, PatronForm},
    pagination::{Page, PageRequest},
    repository::Repository,
    search::patron_filter,
};

#[derive(Clone)]
pub struct PatronsService {
    repository: Repository,
}

fn patron_not_found() -> AppError {
    AppError::NotFound("Patron not found".to_string())
}

impl PatronsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search patrons with pagination
    pub async fn list(&self, search: &str, page: PageRequest) -> AppResult<Page<Patron>> {
        let filter = patron_filter(search);
        let (patrons, total) = self.repository.patrons.search(&filter, page).await?;
        Ok(Page::new(patrons, total, page, search))
    }

    pub async fn list_all(&self) -> AppResult<Vec<Patron>> {
        self.repository.patrons.list_all().await
    }

    pub async fn get(&self, id: i32) -> AppResult<Patron> {
        self.repository
            .patrons
            .get_by_id(id)
            .await?
            .ok_or_else(patron_not_found)
    }

    /// Register a patron; the library card number is assigned by the store
    pub async fn create(&self, form: &PatronForm) -> AppResult<Patron> {
        let input = form.to_input()?;
        let patron = self.repository.patrons.create(&input).await?;
        tracing::info!(
            patron_id = patron.id,
            library_id = %patron.library_id,
            "Patron registered"
        );
        Ok(patron)
    }

    pub async fn update(&self, id: i32, form: &PatronForm) -> AppResult<Patron> {
        self.get(id).await?;
        let input = form.to_input()?;
        let patron = self
            .repository
            .patrons
            .update(id, &input)
            .await?
            .ok_or_else(patron_not_found)?;
        tracing::info!(patron_id = patron.id, "Patron updated");
        Ok(patron)
    }
}
