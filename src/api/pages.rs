//! Landing page and fallback

use maud::Markup;

use super::PAGE_NOT_FOUND;
use crate::{error::AppError, views};

pub async fn index() -> Markup {
    views::pages::index()
}

/// Any route without a handler
pub async fn not_found() -> AppError {
    AppError::NotFound(PAGE_NOT_FOUND.to_string())
}
