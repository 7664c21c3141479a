//! Loan lists, checkout and return pages

use chrono::{Duration, NaiveDate};
use maud::{html, Markup};

use super::{error_list, layout, pagination_nav, search_form};
use crate::{
    error::FieldErrors,
    models::{loan::LOAN_PERIOD_DAYS, CheckoutForm, LoanDetails, LoanScope},
    pagination::Page,
    services::loans::CheckoutOptions,
};

const SCOPES: [LoanScope; 3] = [LoanScope::All, LoanScope::Active, LoanScope::Overdue];

fn scope_tabs(current: LoanScope) -> Markup {
    html! {
        nav.scopes {
            @for scope in SCOPES {
                @if scope == current {
                    strong { (scope.title()) }
                } @else {
                    a href=(scope.path()) { (scope.title()) }
                }
                " "
            }
        }
    }
}

pub fn list(
    scope: LoanScope,
    page: &Page<LoanDetails>,
    search: &str,
    today: NaiveDate,
) -> Markup {
    layout(
        scope.title(),
        html! {
            p { a.button href="/loans/new" { "Create New Loan" } }
            (scope_tabs(scope))
            (search_form(scope.path(), search))
            @if page.items.is_empty() {
                p.empty { "No loans found." }
            } @else {
                table {
                    thead {
                        tr {
                            th { "Book" } th { "Patron" } th { "Loaned on" } th { "Return by" }
                            th { "Returned on" } th { "Status" } th { "Action" }
                        }
                    }
                    tbody {
                        @for details in &page.items {
                            @let loan = &details.loan;
                            tr {
                                td { a href={ "/books/" (loan.book_id) } { (details.book_title) } }
                                td {
                                    a href={ "/patrons/" (loan.patron_id) } { (details.patron_name()) }
                                    " (" (details.patron_library_id.to_string()) ")"
                                }
                                td { (loan.loaned_on.to_string()) }
                                td { (loan.return_by.to_string()) }
                                td {
                                    @if let Some(returned_on) = loan.returned_on { (returned_on.to_string()) }
                                }
                                td { (loan.status(today).label()) }
                                td {
                                    @if loan.is_active() {
                                        a.button href={ "/loans/" (loan.id) "/return" } { "Return Book" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            (pagination_nav(scope.path(), page.pagination.as_ref()))
        },
    )
}

/// Checkout form listing available books and every patron
pub fn checkout_form(
    options: &CheckoutOptions,
    form: &CheckoutForm,
    errors: Option<&FieldErrors>,
    today: NaiveDate,
) -> Markup {
    let chosen_book = form.book_id.trim();
    let chosen_patron = form.patron_id.trim();

    layout(
        "New Loan",
        html! {
            (error_list(errors))
            form method="post" action="/loans/new" {
                p {
                    label for="book_id" { "Book" }
                    select id="book_id" name="book_id" {
                        option value="" { "Select a book" }
                        @for book in &options.books {
                            option value=(book.id) selected[chosen_book == book.id.to_string()] {
                                (book.title) " by " (book.author)
                            }
                        }
                    }
                }
                p {
                    label for="patron_id" { "Patron" }
                    select id="patron_id" name="patron_id" {
                        option value="" { "Select a patron" }
                        @for patron in &options.patrons {
                            option value=(patron.id) selected[chosen_patron == patron.id.to_string()] {
                                (patron.full_name()) " (" (patron.library_id.to_string()) ")"
                            }
                        }
                    }
                }
                p { "Loaned on: " (today.to_string()) }
                p { "Return by: " ((today + Duration::days(LOAN_PERIOD_DAYS)).to_string()) }
                p { button type="submit" { "Create New Loan" } }
            }
            p { a href="/loans" { "Cancel" } }
        },
    )
}

/// Return confirmation for one loan
pub fn return_form(
    details: &LoanDetails,
    today: NaiveDate,
    errors: Option<&FieldErrors>,
) -> Markup {
    let loan = &details.loan;

    layout(
        "Patron: Return Book",
        html! {
            (error_list(errors))
            @if let Some(previous) = loan.returned_on {
                p.notice { "Already returned on " (previous.to_string()) "." }
            }
            @if loan.is_overdue(today) {
                p.notice.overdue { "This book is overdue." }
            }
            dl {
                dt { "Book" } dd { (details.book_title) }
                dt { "Patron" }
                dd { (details.patron_name()) " (" (details.patron_library_id.to_string()) ")" }
                dt { "Loaned on" } dd { (loan.loaned_on.to_string()) }
                dt { "Return by" } dd { (loan.return_by.to_string()) }
                dt { "Returned on" } dd { (today.to_string()) }
            }
            form method="post" action={ "/loans/" (loan.id) "/return" } {
                p { button type="submit" { "Return Book" } }
            }
            p { a href="/loans" { "Cancel" } }
        },
    )
}
