//! Loan pages: scoped lists, checkout and return

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use maud::Markup;

use super::parse_id;
use crate::{
    error::{AppError, AppResult},
    models::{loan::today, CheckoutForm, LoanScope},
    pagination::ListQuery,
    views, AppState,
};

async fn list_scope(
    state: &AppState,
    scope: LoanScope,
    query: &ListQuery,
) -> AppResult<Markup> {
    let today = today();
    let page = state
        .services
        .loans
        .list(scope, query.search(), query.page(), today)
        .await?;
    Ok(views::loans::list(scope, &page, query.search(), today))
}

pub async fn list_loans(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Markup> {
    list_scope(&state, LoanScope::All, &query).await
}

/// Loans not yet returned
pub async fn list_active_loans(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Markup> {
    list_scope(&state, LoanScope::Active, &query).await
}

/// Active loans past their return-by date
pub async fn list_overdue_loans(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Markup> {
    list_scope(&state, LoanScope::Overdue, &query).await
}

pub async fn new_loan(State(state): State<AppState>) -> AppResult<Markup> {
    let options = state.services.loans.checkout_options().await?;
    Ok(views::loans::checkout_form(
        &options,
        &CheckoutForm::default(),
        None,
        today(),
    ))
}

pub async fn create_loan(
    State(state): State<AppState>,
    Form(form): Form<CheckoutForm>,
) -> AppResult<Response> {
    let today = today();
    match state.services.loans.checkout(&form, today).await {
        Ok(_) => Ok(Redirect::to("/loans").into_response()),
        Err(AppError::Validation(errors) | AppError::Conflict(errors)) => {
            let options = state.services.loans.checkout_options().await?;
            Ok(views::loans::checkout_form(&options, &form, Some(&errors), today).into_response())
        }
        Err(err) => Err(err),
    }
}

pub async fn return_loan_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = parse_id(&id)?;
    let details = state.services.loans.get(id).await?;
    Ok(views::loans::return_form(&details, today(), None))
}

/// Record the return as of today
pub async fn return_loan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let today = today();
    match state.services.loans.return_loan(id, today).await {
        Ok(_) => Ok(Redirect::to("/loans").into_response()),
        Err(AppError::Validation(errors) | AppError::Conflict(errors)) => {
            let details = state.services.loans.get(id).await?;
            Ok(views::loans::return_form(&details, today, Some(&errors)).into_response())
        }
        Err(err) => Err(err),
    }
}
