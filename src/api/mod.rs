//! HTTP handlers for the library manager pages

pub mod books;
pub mod health;
pub mod loans;
pub mod pages;
pub mod patrons;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::{
    error::{AppError, AppResult},
    models::parse_exact_integer,
    AppState,
};

/// Message for unknown pages and malformed ids
pub const PAGE_NOT_FOUND: &str = "Page Not Found";

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(health::health_check))
        // Books
        .route("/books", get(books::list_books))
        .route("/books/new", get(books::new_book))
        .route("/books/new", post(books::create_book))
        .route("/books/:id", get(books::get_book))
        .route("/books/:id", put(books::update_book))
        .route("/books/:id", post(books::update_book_form))
        // Patrons
        .route("/patrons", get(patrons::list_patrons))
        .route("/patrons/new", get(patrons::new_patron))
        .route("/patrons/new", post(patrons::create_patron))
        .route("/patrons/:id", get(patrons::get_patron))
        .route("/patrons/:id", put(patrons::update_patron))
        .route("/patrons/:id", post(patrons::update_patron_form))
        // Loans
        .route("/loans", get(loans::list_loans))
        .route("/loans/active", get(loans::list_active_loans))
        .route("/loans/overdue", get(loans::list_overdue_loans))
        .route("/loans/new", get(loans::new_loan))
        .route("/loans/new", post(loans::create_loan))
        .route("/loans/:id/return", get(loans::return_loan_form))
        .route("/loans/:id/return", post(loans::return_loan))
        .fallback(pages::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}

/// Parse an `:id` path segment; anything but a positive integer is a 404
pub(crate) fn parse_id(raw: &str) -> AppResult<i32> {
    parse_exact_integer(raw)
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::NotFound(PAGE_NOT_FOUND.to_string()))
}

/// Browsers cannot send PUT from a form, so updates arrive as POST with
/// `_method=PUT`. A POST without the override has no route.
pub(crate) fn require_put(method: Option<&str>) -> AppResult<()> {
    match method {
        Some(m) if m.trim().eq_ignore_ascii_case("PUT") => Ok(()),
        _ => Err(AppError::NotFound(PAGE_NOT_FOUND.to_string())),
    }
}
