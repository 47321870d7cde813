use async_trait::async_trait;
use sqlx::PgPool;

use super::{BookStore, StoreError};
use crate::modules::books::models::{Book, NewBook, Page};

/// `BookStore` backed by the Postgres `books` table
#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn fetch(&self, id: i64) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>(
            "SELECT id, title, author, publisher, date, rating, status \
             FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn create(&self, new_book: &NewBook) -> Result<Book, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, author, publisher, date, rating, status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, title, author, publisher, date, rating, status",
        )
        .bind(&new_book.title)
        .bind(&new_book.author)
        .bind(&new_book.publisher)
        .bind(&new_book.date)
        .bind(new_book.rating)
        .bind(&new_book.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    async fn update(&self, book: &Book) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>(
            "UPDATE books \
             SET title = $1, author = $2, publisher = $3, date = $4, rating = $5, status = $6 \
             WHERE id = $7 \
             RETURNING id, title, author, publisher, date, rating, status",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(&book.date)
        .bind(book.rating)
        .bind(&book.status)
        .bind(book.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, page: Page) -> Result<Vec<Book>, StoreError> {
        // LIMIT NULL and OFFSET NULL both mean "no bound" in Postgres.
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, publisher, date, rating, status \
             FROM books ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(page.count)
        .bind(page.start)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn clear(&self, restart_ids: bool) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM books").execute(&self.pool).await?;

        if restart_ids {
            sqlx::query("ALTER SEQUENCE books_id_seq RESTART WITH 1")
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }
}
