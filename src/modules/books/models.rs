use inout_db::Record;
use serde::{Deserialize, Serialize};

/// A book in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Caller-supplied identifier, unique and immutable
    pub id: i64,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
}

impl Book {
    pub fn new(id: i64, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
        }
    }
}

impl Record for Book {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Replacement values for a book's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    pub title: String,
    pub author: String,
}

impl BookPatch {
    /// Overwrite `book`'s fields; reports whether anything changed.
    pub fn apply_to(self, book: &mut Book) -> bool {
        let changed = book.title != self.title || book.author != self.author;
        book.title = self.title;
        book.author = self.author;
        changed
    }
}

/// Body of a successful create.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedBook {
    pub id: i64,
}

/// The catalogue a fresh store starts with.
pub fn seed_books() -> Vec<Book> {
    const TOLKIEN: &str = "J.R.R. Tolkien";
    vec![
        Book::new(1, "The Fellowship of the Ring", TOLKIEN),
        Book::new(2, "The Two Towers", TOLKIEN),
        Book::new(3, "The Return of the King", TOLKIEN),
        Book::new(4, "The Hobbit", TOLKIEN),
        Book::new(5, "The Silmarillion", TOLKIEN),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_reports_whether_fields_changed() {
        let mut book = Book::new(1, "Old", "Someone");
        let same = BookPatch {
            title: "Old".to_string(),
            author: "Someone".to_string(),
        };
        assert!(!same.apply_to(&mut book));

        let changed = BookPatch {
            title: "New".to_string(),
            author: "Someone".to_string(),
        };
        assert!(changed.apply_to(&mut book));
        assert_eq!(book, Book::new(1, "New", "Someone"));
    }

    #[test]
    fn seed_ids_are_unique() {
        let mut ids: Vec<i64> = seed_books().iter().map(|book| book.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
