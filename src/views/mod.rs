//! Server-rendered HTML pages.
//!
//! Views are plain functions from models to [`Markup`]. Interpolated values
//! are escaped by `maud`.

pub mod books;
pub mod loans;
pub mod pages;
pub mod patrons;

use maud::{html, Markup, DOCTYPE};

use crate::{error::FieldErrors, pagination::PageInfo};

/// Wrap page content in the shared document shell
pub fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | Library Manager" }
            }
            body {
                header {
                    nav {
                        a href="/" { "Home" }
                        " "
                        a href="/books" { "Books" }
                        " "
                        a href="/patrons" { "Patrons" }
                        " "
                        a href="/loans" { "Loans" }
                    }
                }
                main {
                    h1 { (title) }
                    (content)
                }
            }
        }
    }
}

/// Field error summary shown above a form
pub fn error_list(errors: Option<&FieldErrors>) -> Markup {
    html! {
        @if let Some(errors) = errors.filter(|e| !e.is_empty()) {
            div.errors {
                h2 { "Please correct the following errors:" }
                ul {
                    @for (field, message) in errors.iter() {
                        li data-field=(field) { (message) }
                    }
                }
            }
        }
    }
}

/// Labelled input pre-filled with `value`
pub fn text_input(name: &str, label: &str, value: &str, input_type: &str) -> Markup {
    html! {
        p {
            label for=(name) { (label) }
            input type=(input_type) id=(name) name=(name) value=(value);
        }
    }
}

/// GET search box posting back to `action`
pub fn search_form(action: &str, search: &str) -> Markup {
    html! {
        form.search method="get" action=(action) {
            input type="search" name="search" value=(search) placeholder="Search...";
            button type="submit" { "Search" }
        }
    }
}

/// Link to one page of a list, keeping the current search
pub fn page_href(base_path: &str, page: i64, search: &str) -> String {
    if search.is_empty() {
        format!("{}?page={}", base_path, page)
    } else {
        format!(
            "{}?page={}&search={}",
            base_path,
            page,
            urlencoding::encode(search)
        )
    }
}

/// Previous/next and numbered page links; empty when there is a single page
pub fn pagination_nav(base_path: &str, info: Option<&PageInfo>) -> Markup {
    html! {
        @if let Some(info) = info {
            nav.pagination {
                @if info.current_page > 1 {
                    a href=(page_href(base_path, info.current_page - 1, &info.search_query)) { "Previous" }
                }
                @for page in 1..=info.total_pages {
                    @if page == info.current_page {
                        span.current { (page) }
                    } @else {
                        a href=(page_href(base_path, page, &info.search_query)) { (page) }
                    }
                }
                @if info.current_page < info.total_pages {
                    a href=(page_href(base_path, info.current_page + 1, &info.search_query)) { "Next" }
                }
            }
        }
    }
}

/// Hidden `_method` field turning a POST form into a PUT
pub fn method_put_field() -> Markup {
    html! {
        input type="hidden" name="_method" value="PUT";
    }
}
