//! Free-text search over books, patrons and loans.
//!
//! A search string becomes a [`SearchFilter`]: a list of conditions joined
//! with OR. Text conditions are case-insensitive substring matches; numeric
//! conditions are exact. The same filter is rendered into SQL by the
//! repositories and can be evaluated against rows in memory.

use sqlx::{Postgres, QueryBuilder};

use crate::models::{
    parse_exact_integer, patron::extract_library_id, Book, LoanDetails, Patron,
};

/// A searchable column of some entity
pub trait SearchField: Copy + Eq + std::fmt::Debug {
    /// Column expression used in SQL
    fn column(self) -> &'static str;
}

/// A row the filter can be evaluated against without a database
pub trait Searchable {
    type Field: SearchField;

    fn text(&self, field: Self::Field) -> Option<&str>;
    fn number(&self, field: Self::Field) -> Option<i32>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition<F> {
    /// Case-insensitive substring match
    Contains(F, String),
    /// Exact numeric match
    Equals(F, i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter<F> {
    conditions: Vec<Condition<F>>,
}

impl<F> Default for SearchFilter<F> {
    fn default() -> Self {
        Self { conditions: Vec::new() }
    }
}

impl<F: SearchField> SearchFilter<F> {
    /// Filter matching every row
    pub fn all() -> Self {
        Self::default()
    }

    fn contains_any(search: &str, fields: &[F]) -> Self {
        Self {
            conditions: fields
                .iter()
                .map(|field| Condition::Contains(*field, search.to_string()))
                .collect(),
        }
    }

    fn or_equals(mut self, field: F, value: Option<i32>) -> Self {
        if let Some(value) = value {
            self.conditions.push(Condition::Equals(field, value));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[Condition<F>] {
        &self.conditions
    }

    /// Whether `row` satisfies at least one condition (an empty filter matches all)
    pub fn matches<R: Searchable<Field = F>>(&self, row: &R) -> bool {
        if self.is_empty() {
            return true;
        }
        self.conditions.iter().any(|condition| match condition {
            Condition::Contains(field, needle) => row
                .text(*field)
                .map(|value| value.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            Condition::Equals(field, expected) => row.number(*field) == Some(*expected),
        })
    }

    /// Append ` AND (cond OR cond ...)` to a query that already has a WHERE clause
    pub fn push_and(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        if self.is_empty() {
            return;
        }

        builder.push(" AND (");
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            match condition {
                Condition::Contains(field, needle) => {
                    builder
                        .push(field.column())
                        .push(" ILIKE ")
                        .push_bind(like_pattern(needle))
                        .push(" ESCAPE '\\'");
                }
                Condition::Equals(field, value) => {
                    builder.push(field.column()).push(" = ").push_bind(*value);
                }
            }
        }
        builder.push(")");
    }
}

/// `%needle%` with LIKE metacharacters escaped
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// =============================================================================
// Books
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    Author,
    Genre,
    FirstPublished,
}

impl SearchField for BookField {
    fn column(self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Genre => "genre",
            BookField::FirstPublished => "first_published",
        }
    }
}

impl Searchable for Book {
    type Field = BookField;

    fn text(&self, field: BookField) -> Option<&str> {
        match field {
            BookField::Title => Some(&self.title),
            BookField::Author => Some(&self.author),
            BookField::Genre => self.genre.as_deref(),
            BookField::FirstPublished => None,
        }
    }

    fn number(&self, field: BookField) -> Option<i32> {
        match field {
            BookField::FirstPublished => self.first_published,
            _ => None,
        }
    }
}

/// Title, author and genre; a plain integer also matches the publication year
pub fn book_filter(search: &str) -> SearchFilter<BookField> {
    if search.is_empty() {
        return SearchFilter::all();
    }
    SearchFilter::contains_any(search, &[BookField::Title, BookField::Author, BookField::Genre])
        .or_equals(BookField::FirstPublished, parse_exact_integer(search))
}

// =============================================================================
// Patrons
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatronField {
    FirstName,
    LastName,
    Email,
    Address,
    ZipCode,
    LibraryId,
}

impl SearchField for PatronField {
    fn column(self) -> &'static str {
        match self {
            PatronField::FirstName => "first_name",
            PatronField::LastName => "last_name",
            PatronField::Email => "email",
            PatronField::Address => "address",
            PatronField::ZipCode => "zip_code",
            PatronField::LibraryId => "library_id",
        }
    }
}

impl Searchable for Patron {
    type Field = PatronField;

    fn text(&self, field: PatronField) -> Option<&str> {
        match field {
            PatronField::FirstName => Some(&self.first_name),
            PatronField::LastName => Some(&self.last_name),
            PatronField::Email => Some(&self.email),
            PatronField::Address => self.address.as_deref(),
            PatronField::ZipCode => self.zip_code.as_deref(),
            PatronField::LibraryId => None,
        }
    }

    fn number(&self, field: PatronField) -> Option<i32> {
        match field {
            PatronField::LibraryId => Some(self.library_id.value()),
            _ => None,
        }
    }
}

/// Names, email, address and ZIP; `MCL1001` or `1001` also matches the card number
pub fn patron_filter(search: &str) -> SearchFilter<PatronField> {
    if search.is_empty() {
        return SearchFilter::all();
    }
    SearchFilter::contains_any(
        search,
        &[
            PatronField::FirstName,
            PatronField::LastName,
            PatronField::Email,
            PatronField::Address,
            PatronField::ZipCode,
        ],
    )
    .or_equals(PatronField::LibraryId, extract_library_id(search))
}

// =============================================================================
// Loans
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanField {
    BookTitle,
    PatronFirstName,
    PatronLastName,
    PatronLibraryId,
}

impl SearchField for LoanField {
    fn column(self) -> &'static str {
        match self {
            LoanField::BookTitle => "b.title",
            LoanField::PatronFirstName => "p.first_name",
            LoanField::PatronLastName => "p.last_name",
            LoanField::PatronLibraryId => "p.library_id",
        }
    }
}

impl Searchable for LoanDetails {
    type Field = LoanField;

    fn text(&self, field: LoanField) -> Option<&str> {
        match field {
            LoanField::BookTitle => Some(&self.book_title),
            LoanField::PatronFirstName => Some(&self.patron_first_name),
            LoanField::PatronLastName => Some(&self.patron_last_name),
            LoanField::PatronLibraryId => None,
        }
    }

    fn number(&self, field: LoanField) -> Option<i32> {
        match field {
            LoanField::PatronLibraryId => Some(self.patron_library_id.value()),
            _ => None,
        }
    }
}

/// Book title and patron names; a card number matches the borrowing patron
pub fn loan_filter(search: &str) -> SearchFilter<LoanField> {
    if search.is_empty() {
        return SearchFilter::all();
    }
    SearchFilter::contains_any(
        search,
        &[
            LoanField::BookTitle,
            LoanField::PatronFirstName,
            LoanField::PatronLastName,
        ],
    )
    .or_equals(LoanField::PatronLibraryId, extract_library_id(search))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LibraryId, Loan};
    use chrono::NaiveDate;

    fn book(id: i32, title: &str, author: &str, genre: Option<&str>, year: Option<i32>) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.map(str::to_string),
            first_published: year,
        }
    }

    fn patron(id: i32, first: &str, last: &str, library_id: i32, zip: Option<&str>) -> Patron {
        Patron {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            address: None,
            email: format!("{}@example.com", first.to_lowercase()),
            library_id: LibraryId(library_id),
            zip_code: zip.map(str::to_string),
        }
    }

    fn books() -> Vec<Book> {
        vec![
            book(1, "Dune", "Frank Herbert", Some("Science Fiction"), Some(1965)),
            book(2, "Emma", "Jane Austen", Some("Classic"), Some(1815)),
            book(3, "1984", "George Orwell", None, Some(1949)),
            book(4, "The Hobbit", "J.R.R. Tolkien", Some("Fantasy"), Some(1937)),
        ]
    }

    fn matching_ids<R: Searchable + HasId>(filter: &SearchFilter<R::Field>, rows: &[R]) -> Vec<i32> {
        rows.iter().filter(|r| filter.matches(*r)).map(HasId::id).collect()
    }

    trait HasId {
        fn id(&self) -> i32;
    }

    impl HasId for Book {
        fn id(&self) -> i32 {
            self.id
        }
    }

    impl HasId for Patron {
        fn id(&self) -> i32 {
            self.id
        }
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let filter = book_filter("");
        assert!(filter.is_empty());
        assert_eq!(matching_ids(&filter, &books()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_book_text_search_is_case_insensitive() {
        assert_eq!(matching_ids(&book_filter("AUSTEN"), &books()), vec![2]);
        assert_eq!(matching_ids(&book_filter("fic"), &books()), vec![1]);
        assert_eq!(matching_ids(&book_filter("the"), &books()), vec![4]);
    }

    #[test]
    fn test_book_numeric_search_matches_year_or_title() {
        let filter = book_filter("1984");
        assert!(filter
            .conditions()
            .contains(&Condition::Equals(BookField::FirstPublished, 1984)));
        assert_eq!(matching_ids(&filter, &books()), vec![3]);

        assert_eq!(matching_ids(&book_filter("1965"), &books()), vec![1]);
    }

    #[test]
    fn test_book_non_canonical_number_is_text_only() {
        let filter = book_filter("01965");
        assert!(!filter
            .conditions()
            .iter()
            .any(|c| matches!(c, Condition::Equals(..))));
        assert!(matching_ids(&filter, &books()).is_empty());
    }

    #[test]
    fn test_patron_search_by_card_number() {
        let patrons = vec![
            patron(1, "Ada", "Lovelace", 1001, Some("12345")),
            patron(2, "Alan", "Turing", 1002, None),
            patron(3, "Grace", "Hopper", 1010, Some("10010")),
        ];

        assert_eq!(matching_ids(&patron_filter("MCL1002"), &patrons), vec![2]);
        assert_eq!(matching_ids(&patron_filter("mcl1002"), &patrons), vec![2]);
        assert_eq!(matching_ids(&patron_filter("1002"), &patrons), vec![2]);
        // "1001" matches Ada's card and Grace's ZIP code
        assert_eq!(matching_ids(&patron_filter("1001"), &patrons), vec![1, 3]);
        assert_eq!(matching_ids(&patron_filter("tur"), &patrons), vec![2]);
    }

    #[test]
    fn test_bare_prefix_is_not_a_card_number() {
        let filter = patron_filter("MCL");
        assert!(filter
            .conditions()
            .iter()
            .all(|c| matches!(c, Condition::Contains(..))));
        assert_eq!(filter.conditions().len(), 5);
    }

    #[test]
    fn test_loan_search() {
        let loan = |id, title: &str, first: &str, last: &str, card| LoanDetails {
            loan: Loan {
                id,
                book_id: id,
                patron_id: id,
                loaned_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                return_by: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                returned_on: None,
            },
            book_title: title.to_string(),
            patron_first_name: first.to_string(),
            patron_last_name: last.to_string(),
            patron_library_id: LibraryId(card),
        };
        let loans = vec![
            loan(1, "Dune", "Ada", "Lovelace", 1001),
            loan(2, "Emma", "Alan", "Turing", 1002),
        ];
        let ids = |filter: SearchFilter<LoanField>| -> Vec<i32> {
            loans.iter().filter(|l| filter.matches(*l)).map(|l| l.loan.id).collect()
        };

        assert_eq!(ids(loan_filter("dune")), vec![1]);
        assert_eq!(ids(loan_filter("TURING")), vec![2]);
        assert_eq!(ids(loan_filter("MCL1001")), vec![1]);
        assert_eq!(ids(loan_filter("")), vec![1, 2]);
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("dune"), "%dune%");
        assert_eq!(like_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }

    #[test]
    fn test_sql_rendering() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM patrons WHERE 1=1");
        patron_filter("MCL1001").push_and(&mut builder);
        let sql = builder.sql();
        assert!(sql.starts_with("SELECT * FROM patrons WHERE 1=1 AND (first_name ILIKE $1"));
        assert!(sql.contains(" OR library_id = $6)"));

        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM books WHERE 1=1");
        book_filter("").push_and(&mut builder);
        assert_eq!(builder.sql(), "SELECT * FROM books WHERE 1=1");
    }
}
