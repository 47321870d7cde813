//! Data access for the `books` table.
//!
//! Every operation issues a single statement against the backing store and
//! propagates failures untouched; mapping to HTTP statuses happens in the
//! route handlers.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::models::{Book, NewBook, Page};

pub use memory::MemoryBookStore;
pub use postgres::PgBookStore;

/// Store handle shared by every handler for the life of the process
pub type SharedStore = Arc<dyn BookStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Book not found")]
    NotFound,

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Fetch a single book by id
    async fn fetch(&self, id: i64) -> Result<Book, StoreError>;

    /// Insert a book; the store assigns the id
    async fn create(&self, new_book: &NewBook) -> Result<Book, StoreError>;

    /// Overwrite every column of the row identified by `book.id`
    async fn update(&self, book: &Book) -> Result<Book, StoreError>;

    /// Remove a book, returning whether a row existed
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Books ordered by id, windowed by `page`
    async fn list(&self, page: Page) -> Result<Vec<Book>, StoreError>;

    /// Remove every book, optionally restarting id assignment at 1
    async fn clear(&self, restart_ids: bool) -> Result<(), StoreError>;
}
