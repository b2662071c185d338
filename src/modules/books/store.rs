//! Storage collaborator consumed by the book handlers.

use std::sync::Arc;

use async_trait::async_trait;
use inout_db::{InsertResult, MemoryCollection, StoreResult, WriteResult};

use super::models::{seed_books, Book, BookPatch};

/// Storage operations the book handlers depend on.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find(&self) -> StoreResult<Vec<Book>>;

    async fn find_one(&self, id: i64) -> StoreResult<Option<Book>>;

    /// Fails with `DuplicateKey` when `book.id` is taken.
    async fn insert_one(&self, book: Book) -> StoreResult<InsertResult<Book>>;

    /// Fails with `NoMatchingItem` when no book has `id`.
    async fn update_one(&self, id: i64, patch: BookPatch) -> StoreResult<WriteResult>;

    /// Fails with `NoMatchingItem` when no book has `id`.
    async fn delete_one(&self, id: i64) -> StoreResult<WriteResult>;
}

pub type SharedBookStore = Arc<dyn BookStore>;

#[async_trait]
impl BookStore for MemoryCollection<Book> {
    async fn find(&self) -> StoreResult<Vec<Book>> {
        MemoryCollection::find(self).await
    }

    async fn find_one(&self, id: i64) -> StoreResult<Option<Book>> {
        MemoryCollection::find_one(self, id).await
    }

    async fn insert_one(&self, book: Book) -> StoreResult<InsertResult<Book>> {
        MemoryCollection::insert_one(self, book).await
    }

    async fn update_one(&self, id: i64, patch: BookPatch) -> StoreResult<WriteResult> {
        MemoryCollection::update_one(self, id, move |book| patch.apply_to(book)).await
    }

    async fn delete_one(&self, id: i64) -> StoreResult<WriteResult> {
        MemoryCollection::delete_one(self, id).await
    }
}

/// In-memory store, optionally holding the seed catalogue.
pub fn memory_store(seed: bool) -> SharedBookStore {
    let books = if seed { seed_books() } else { Vec::new() };
    Arc::new(MemoryCollection::with_records("books", books))
}
