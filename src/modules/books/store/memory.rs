use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookStore, StoreError};
use crate::modules::books::models::{Book, NewBook, Page};

/// Process-local `BookStore` with the same id sequence behaviour as the
/// Postgres table. Used by tests and `database.in_memory` mode.
#[derive(Debug)]
pub struct MemoryBookStore {
    state: RwLock<State>,
}

#[derive(Debug)]
struct State {
    books: BTreeMap<i64, Book>,
    next_id: i64,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                books: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn fetch(&self, id: i64) -> Result<Book, StoreError> {
        self.state
            .read()
            .await
            .books
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, new_book: &NewBook) -> Result<Book, StoreError> {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let book = Book::from_new(id, new_book);
        state.books.insert(id, book.clone());
        Ok(book)
    }

    async fn update(&self, book: &Book) -> Result<Book, StoreError> {
        let mut state = self.state.write().await;
        let stored = state.books.get_mut(&book.id).ok_or(StoreError::NotFound)?;
        *stored = book.clone();
        Ok(book.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.state.write().await.books.remove(&id).is_some())
    }

    async fn list(&self, page: Page) -> Result<Vec<Book>, StoreError> {
        let state = self.state.read().await;
        let window = state.books.values().skip(page.offset());

        let books = match page.limit() {
            Some(limit) => window.take(limit).cloned().collect(),
            None => window.cloned().collect(),
        };
        Ok(books)
    }

    async fn clear(&self, restart_ids: bool) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.books.clear();
        if restart_ids {
            state.next_id = 1;
        }
        Ok(())
    }
}
