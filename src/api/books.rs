//! Book pages

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use maud::Markup;

use super::{parse_id, require_put};
use crate::{
    error::{AppError, AppResult},
    models::BookForm,
    pagination::ListQuery,
    views, AppState,
};

/// Paginated, searchable book list
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Markup> {
    let page = state.services.books.list(query.search(), query.page()).await?;
    Ok(views::books::list(&page, query.search()))
}

pub async fn new_book() -> Markup {
    views::books::new_form(&BookForm::default(), None)
}

pub async fn create_book(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    match state.services.books.create(&form).await {
        Ok(_) => Ok(Redirect::to("/books").into_response()),
        Err(AppError::Validation(errors) | AppError::Conflict(errors)) => {
            Ok(views::books::new_form(&form, Some(&errors)).into_response())
        }
        Err(err) => Err(err),
    }
}

/// Edit form for one book
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = parse_id(&id)?;
    let book = state.services.books.get(id).await?;
    Ok(views::books::edit_form(book.id, &BookForm::from(&book), None))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    match state.services.books.update(id, &form).await {
        Ok(_) => Ok(Redirect::to("/books").into_response()),
        Err(AppError::Validation(errors) | AppError::Conflict(errors)) => {
            Ok(views::books::edit_form(id, &form, Some(&errors)).into_response())
        }
        Err(err) => Err(err),
    }
}

/// Update submitted by an HTML form (`POST` with `_method=PUT`)
pub async fn update_book_form(
    state: State<AppState>,
    id: Path<String>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    require_put(form.method.as_deref())?;
    update_book(state, id, Form(form)).await
}
