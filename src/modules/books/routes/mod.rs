//! HTTP handlers for the books module.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection, QueryRejection},
        DefaultBodyLimit, Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use folio_http::error::AppError;
use garde::Validate;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::models::{Book, BookPatch, NewBook, Page};
use super::store::{SharedStore, StoreError};

const NOT_FOUND_MESSAGE: &str = "Book not found";

/// Routes for the book resource, bound to the given store
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/books", get(list_books))
        .route("/book", post(create_book))
        .route(
            "/book/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .layer(DefaultBodyLimit::disable())
        .with_state(store)
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::not_found(NOT_FOUND_MESSAGE),
            StoreError::Storage(e) => AppError::Internal(e.into()),
        }
    }
}

async fn list_books(
    State(store): State<SharedStore>,
    query: Result<Query<Page>, QueryRejection>,
) -> Result<Json<Vec<Book>>, AppError> {
    let Query(page) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    page.validate().map_err(invalid_fields)?;

    let books = store.list(page).await?;
    Ok(Json(books))
}

async fn get_book(
    State(store): State<SharedStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(id)?;
    let book = store.fetch(id).await?;
    Ok(Json(book))
}

async fn create_book(
    State(store): State<SharedStore>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let new_book: NewBook = decode(body)?;

    let book = store.create(&new_book).await?;
    tracing::info!(book_id = book.id, "book created");

    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(store): State<SharedStore>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(id)?;
    let current = store.fetch(id).await?;
    let patch: BookPatch = decode(body)?;

    let book = store.update(&patch.apply(&current)).await?;
    tracing::info!(book_id = book.id, "book updated");

    Ok(Json(book))
}

async fn delete_book(
    State(store): State<SharedStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let id = book_id(id)?;

    if store.delete(id).await? {
        tracing::info!(book_id = id, "book deleted");
    } else {
        tracing::debug!(book_id = id, "delete matched no book");
    }

    Ok(Json(json!({ "result": "success" })))
}

fn book_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    id.map(|Path(id)| id).map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "rejected book id");
        AppError::bad_request("Invalid book ID")
    })
}

/// Decode a JSON body whatever its content type, then validate it.
fn decode<T>(body: Result<Bytes, BytesRejection>) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate<Context = ()>,
{
    let body = body.map_err(|rejection| {
        AppError::bad_request(format!("Invalid request payload: {}", rejection.body_text()))
    })?;
    let value: T = serde_json::from_slice(&body)
        .map_err(|err| AppError::bad_request(format!("Invalid request payload: {err}")))?;
    value.validate().map_err(invalid_fields)?;
    Ok(value)
}

fn invalid_fields(report: garde::Report) -> AppError {
    let details = report
        .iter()
        .map(|(path, error)| json!({ "field": path.to_string(), "message": error.message() }))
        .collect();
    AppError::invalid(details, "Invalid request payload")
}
