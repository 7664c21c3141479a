//! Patron list and forms

use maud::{html, Markup};

use super::{error_list, layout, method_put_field, pagination_nav, search_form, text_input};
use crate::{
    error::FieldErrors,
    models::{LibraryId, Patron, PatronForm},
    pagination::Page,
};

pub fn list(page: &Page<Patron>, search: &str) -> Markup {
    layout(
        "Patrons",
        html! {
            p { a.button href="/patrons/new" { "Create New Patron" } }
            (search_form("/patrons", search))
            @if page.items.is_empty() {
                p.empty { "No patrons found." }
            } @else {
                table {
                    thead {
                        tr {
                            th { "Name" } th { "Address" } th { "Email" } th { "Library ID" } th { "Zip" }
                        }
                    }
                    tbody {
                        @for patron in &page.items {
                            tr {
                                td { a href={ "/patrons/" (patron.id) } { (patron.full_name()) } }
                                td { (patron.address.as_deref().unwrap_or("")) }
                                td { (patron.email) }
                                td { (patron.library_id.to_string()) }
                                td { (patron.zip_code.as_deref().unwrap_or("")) }
                            }
                        }
                    }
                }
            }
            (pagination_nav("/patrons", page.pagination.as_ref()))
        },
    )
}

fn fields(form: &PatronForm) -> Markup {
    html! {
        (text_input("first_name", "First Name", &form.first_name, "text"))
        (text_input("last_name", "Last Name", &form.last_name, "text"))
        (text_input("address", "Address", form.address.as_deref().unwrap_or(""), "text"))
        (text_input("email", "Email", &form.email, "email"))
        (text_input("zip_code", "Zip Code", form.zip_code.as_deref().unwrap_or(""), "text"))
    }
}

pub fn new_form(form: &PatronForm, errors: Option<&FieldErrors>) -> Markup {
    layout(
        "New Patron",
        html! {
            (error_list(errors))
            form method="post" action="/patrons/new" {
                (fields(form))
                p { button type="submit" { "Create New Patron" } }
            }
            p { a href="/patrons" { "Cancel" } }
        },
    )
}

/// Edit form; the library card number is shown but never editable
pub fn edit_form(
    id: i32,
    library_id: LibraryId,
    form: &PatronForm,
    errors: Option<&FieldErrors>,
) -> Markup {
    let title = format!("Patron: {} {}", form.first_name, form.last_name);
    layout(
        title.trim(),
        html! {
            (error_list(errors))
            p.library-id { "Library ID: " (library_id.to_string()) }
            form method="post" action={ "/patrons/" (id) } {
                (method_put_field())
                (fields(form))
                p { button type="submit" { "Update Patron" } }
            }
            p { a href="/patrons" { "Cancel" } }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageRequest;

    #[test]
    fn test_list_shows_formatted_library_id() {
        let patrons = vec![Patron {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            address: None,
            email: "ada@example.com".to_string(),
            library_id: LibraryId(1001),
            zip_code: None,
        }];
        let page = list(&Page::new(patrons, 1, PageRequest::default(), ""), "").into_string();
        assert!(page.contains("<td>MCL1001</td>"));
        assert!(page.contains("<a href=\"/patrons/1\">Ada Lovelace</a>"));
    }

    #[test]
    fn test_edit_form_has_no_library_id_input() {
        let page = edit_form(1, LibraryId(1001), &PatronForm::default(), None).into_string();
        assert!(page.contains("Library ID: MCL1001"));
        assert!(!page.contains("name=\"library_id\""));
    }
}
