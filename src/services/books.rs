//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookForm},
    pagination::{Page, PageRequest},
    repository::Repository,
    search::book_filter,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

fn book_not_found() -> AppError {
    AppError::NotFound("Book not found".to_string())
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books with pagination
    pub async fn list(&self, search: &str, page: PageRequest) -> AppResult<Page<Book>> {
        let filter = book_filter(search);
        let (books, total) = self.repository.books.search(&filter, page).await?;
        Ok(Page::new(books, total, page, search))
    }

    pub async fn get(&self, id: i32) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(book_not_found)
    }

    pub async fn create(&self, form: &BookForm) -> AppResult<Book> {
        let input = form.to_input()?;
        let book = self.repository.books.create(&input).await?;
        tracing::info!(book_id = book.id, title = %book.title, "Book created");
        Ok(book)
    }

    pub async fn update(&self, id: i32, form: &BookForm) -> AppResult<Book> {
        self.get(id).await?;
        let input = form.to_input()?;
        let book = self
            .repository
            .books
            .update(id, &input)
            .await?
            .ok_or_else(book_not_found)?;
        tracing::info!(book_id = book.id, "Book updated");
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use mockall::predicate::eq;

    use super::*;
    use crate::{
        models::BookInput,
        repository::{MockBookStore, MockLoanStore, MockPatronStore},
        search::{BookField, Condition},
        services::test_support::repository,
    };

    fn service(books: MockBookStore) -> BooksService {
        BooksService::new(repository(books, MockPatronStore::new(), MockLoanStore::new()))
    }

    fn dune() -> Book {
        Book {
            id: 7,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: None,
            first_published: None,
        }
    }

    #[tokio::test]
    async fn test_created_book_reads_back_identically() {
        // In-memory table shared by the create and get_by_id mocks
        let table: Arc<Mutex<Vec<Book>>> = Arc::default();
        let mut books = MockBookStore::new();

        let rows = table.clone();
        books.expect_create().times(1).returning(move |input: &BookInput| {
            let mut rows = rows.lock().unwrap();
            let book = Book {
                id: rows.len() as i32 + 1,
                title: input.title.clone(),
                author: input.author.clone(),
                genre: input.genre.clone(),
                first_published: input.first_published,
            };
            rows.push(book.clone());
            Ok(book)
        });
        let rows = table.clone();
        books.expect_get_by_id().returning(move |id| {
            Ok(rows.lock().unwrap().iter().find(|b| b.id == id).cloned())
        });

        let service = service(books);
        let form = BookForm {
            title: "The Left Hand of Darkness".to_string(),
            author: "Ursula K. Le Guin".to_string(),
            genre: Some("Science Fiction".to_string()),
            first_published: Some("1969".to_string()),
            method: None,
        };

        let created = service.create(&form).await.unwrap();
        let fetched = service.get(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.title, form.title);
        assert_eq!(fetched.author, form.author);
        assert_eq!(fetched.genre, form.genre);
        assert_eq!(fetched.first_published, Some(1969));
    }

    #[tokio::test]
    async fn test_invalid_book_is_not_persisted() {
        let mut books = MockBookStore::new();
        books.expect_create().never();

        let form = BookForm {
            author: "Anonymous".to_string(),
            ..BookForm::default()
        };
        let err = service(books).create(&form).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e.contains("title")));
    }

    #[tokio::test]
    async fn test_missing_book_is_not_found() {
        let mut books = MockBookStore::new();
        books.expect_get_by_id().with(eq(99)).returning(|_| Ok(None));

        let err = service(books).get(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Book not found"));
    }

    #[tokio::test]
    async fn test_update_missing_book_skips_validation() {
        let mut books = MockBookStore::new();
        books.expect_get_by_id().returning(|_| Ok(None));
        books.expect_update().never();

        let err = service(books)
            .update(3, &BookForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_writes_new_values() {
        let mut books = MockBookStore::new();
        books.expect_get_by_id().returning(|_| Ok(Some(dune())));
        books
            .expect_update()
            .withf(|id, input| *id == 7 && input.genre.as_deref() == Some("Classic"))
            .returning(|id, input| {
                Ok(Some(Book {
                    id,
                    title: input.title.clone(),
                    author: input.author.clone(),
                    genre: input.genre.clone(),
                    first_published: input.first_published,
                }))
            });

        let mut form = BookForm::from(&dune());
        form.genre = Some("Classic".to_string());
        let book = service(books).update(7, &form).await.unwrap();
        assert_eq!(book.genre.as_deref(), Some("Classic"));
    }

    #[tokio::test]
    async fn test_list_builds_filter_and_pagination() {
        let mut books = MockBookStore::new();
        books
            .expect_search()
            .withf(|filter, page| {
                page.page() == 2
                    && filter
                        .conditions()
                        .contains(&Condition::Contains(BookField::Author, "herbert".to_string()))
            })
            .returning(|_, _| Ok((vec![dune()], 25)));

        let page = service(books)
            .list("herbert", PageRequest::new(2))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        let info = page.pagination.unwrap();
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.search_query, "herbert");
    }
}
