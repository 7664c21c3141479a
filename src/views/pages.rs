//! Landing and error pages

use axum::http::StatusCode;
use maud::{html, Markup};

use super::layout;

pub fn index() -> Markup {
    layout(
        "Library Manager",
        html! {
            ul.menu {
                li { a href="/books" { "Books" } " (" a href="/books/new" { "add a book" } ")" }
                li { a href="/patrons" { "Patrons" } " (" a href="/patrons/new" { "register a patron" } ")" }
                li { a href="/loans" { "All loans" } }
                li { a href="/loans/active" { "Checked out books" } }
                li { a href="/loans/overdue" { "Overdue books" } }
                li { a href="/loans/new" { "Check out a book" } }
            }
        },
    )
}

pub fn error(status: StatusCode, message: &str) -> Markup {
    let title = if status == StatusCode::NOT_FOUND {
        "Page Not Found"
    } else {
        "Error"
    };
    layout(
        title,
        html! {
            p.status { (status.as_u16()) }
            p.message { (message) }
            p { a href="/" { "Back to home" } }
        },
    )
}
