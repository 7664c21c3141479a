//! Book list and forms

use maud::{html, Markup};

use super::{error_list, layout, method_put_field, pagination_nav, search_form, text_input};
use crate::{
    error::FieldErrors,
    models::{Book, BookForm},
    pagination::Page,
};

pub fn list(page: &Page<Book>, search: &str) -> Markup {
    layout(
        "Books",
        html! {
            p { a.button href="/books/new" { "Create New Book" } }
            (search_form("/books", search))
            @if page.items.is_empty() {
                p.empty { "No books found." }
            } @else {
                table {
                    thead {
                        tr { th { "Title" } th { "Author" } th { "Genre" } th { "Year" } }
                    }
                    tbody {
                        @for book in &page.items {
                            tr {
                                td { a href={ "/books/" (book.id) } { (book.title) } }
                                td { (book.author) }
                                td { (book.genre.as_deref().unwrap_or("")) }
                                td {
                                    @if let Some(year) = book.first_published { (year) }
                                }
                            }
                        }
                    }
                }
            }
            (pagination_nav("/books", page.pagination.as_ref()))
        },
    )
}

fn fields(form: &BookForm) -> Markup {
    html! {
        (text_input("title", "Title", &form.title, "text"))
        (text_input("author", "Author", &form.author, "text"))
        (text_input("genre", "Genre", form.genre.as_deref().unwrap_or(""), "text"))
        (text_input(
            "first_published",
            "First Published",
            form.first_published.as_deref().unwrap_or(""),
            "text",
        ))
    }
}

/// Creation form, pre-filled with `form` after a failed submission
pub fn new_form(form: &BookForm, errors: Option<&FieldErrors>) -> Markup {
    layout(
        "New Book",
        html! {
            (error_list(errors))
            form method="post" action="/books/new" {
                (fields(form))
                p { button type="submit" { "Create New Book" } }
            }
            p { a href="/books" { "Cancel" } }
        },
    )
}

pub fn edit_form(id: i32, form: &BookForm, errors: Option<&FieldErrors>) -> Markup {
    layout(
        "Update Book",
        html! {
            (error_list(errors))
            form method="post" action={ "/books/" (id) } {
                (method_put_field())
                (fields(form))
                p { button type="submit" { "Update Book" } }
            }
            p { a href="/books" { "Cancel" } }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageRequest;

    #[test]
    fn test_list_links_rows_and_escapes() {
        let books = vec![Book {
            id: 3,
            title: "Pride & Prejudice".to_string(),
            author: "Jane Austen".to_string(),
            genre: None,
            first_published: Some(1813),
        }];
        let page = list(&Page::new(books, 1, PageRequest::default(), ""), "").into_string();
        assert!(page.contains("<a href=\"/books/3\">Pride &amp; Prejudice</a>"));
        assert!(page.contains("<td>1813</td>"));
        assert!(!page.contains("class=\"pagination\""));
    }

    #[test]
    fn test_empty_list() {
        let page = list(&Page::new(Vec::new(), 0, PageRequest::default(), "zzz"), "zzz").into_string();
        assert!(page.contains("No books found."));
        assert!(page.contains("value=\"zzz\""));
    }

    #[test]
    fn test_new_form_keeps_submitted_values() {
        let form = BookForm {
            title: String::new(),
            author: "Mary Shelley".to_string(),
            first_published: Some("18x8".to_string()),
            ..BookForm::default()
        };
        let errors = FieldErrors::single("title", "Title is required and cannot be empty.");
        let page = new_form(&form, Some(&errors)).into_string();
        assert!(page.contains("value=\"Mary Shelley\""));
        assert!(page.contains("value=\"18x8\""));
        assert!(page.contains("Title is required and cannot be empty."));
    }

    #[test]
    fn test_edit_form_overrides_method() {
        let page = edit_form(9, &BookForm::default(), None).into_string();
        assert!(page.contains("action=\"/books/9\""));
        assert!(page.contains("name=\"_method\" value=\"PUT\""));
    }
}
