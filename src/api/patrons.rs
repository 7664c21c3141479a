//! Patron pages

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use maud::Markup;

use super::{parse_id, require_put};
use crate::{
    error::{AppError, AppResult},
    models::PatronForm,
    pagination::ListQuery,
    views, AppState,
};

pub async fn list_patrons(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Markup> {
    let page = state
        .services
        .patrons
        .list(query.search(), query.page())
        .await?;
    Ok(views::patrons::list(&page, query.search()))
}

pub async fn new_patron() -> Markup {
    views::patrons::new_form(&PatronForm::default(), None)
}

/// Register a patron; the library card number is assigned on success
pub async fn create_patron(
    State(state): State<AppState>,
    Form(form): Form<PatronForm>,
) -> AppResult<Response> {
    match state.services.patrons.create(&form).await {
        Ok(_) => Ok(Redirect::to("/patrons").into_response()),
        Err(AppError::Validation(errors) | AppError::Conflict(errors)) => {
            Ok(views::patrons::new_form(&form, Some(&errors)).into_response())
        }
        Err(err) => Err(err),
    }
}

pub async fn get_patron(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = parse_id(&id)?;
    let patron = state.services.patrons.get(id).await?;
    Ok(views::patrons::edit_form(
        patron.id,
        patron.library_id,
        &PatronForm::from(&patron),
        None,
    ))
}

pub async fn update_patron(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<PatronForm>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    match state.services.patrons.update(id, &form).await {
        Ok(_) => Ok(Redirect::to("/patrons").into_response()),
        Err(AppError::Validation(errors) | AppError::Conflict(errors)) => {
            // The card number is not part of the form
            let patron = state.services.patrons.get(id).await?;
            Ok(
                views::patrons::edit_form(id, patron.library_id, &form, Some(&errors))
                    .into_response(),
            )
        }
        Err(err) => Err(err),
    }
}

/// Update submitted by an HTML form (`POST` with `_method=PUT`)
pub async fn update_patron_form(
    state: State<AppState>,
    id: Path<String>,
    Form(form): Form<PatronForm>,
) -> AppResult<Response> {
    require_put(form.method.as_deref())?;
    update_patron(state, id, Form(form)).await
}
