//! Business logic services

pub mod books;
pub mod loans;
pub mod patrons;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub patrons: patrons::PatronsService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            patrons: patrons::PatronsService::new(repository.clone()),
            loans: loans::LoansService::new(repository),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::repository::{MockBookStore, MockLoanStore, MockPatronStore, Repository};

    /// Repository backed by mocks; unset expectations fail the test when hit
    pub fn repository(
        books: MockBookStore,
        patrons: MockPatronStore,
        loans: MockLoanStore,
    ) -> Repository {
        Repository::from_stores(Arc::new(books), Arc::new(patrons), Arc::new(loans))
    }
}
