//! HTTP handlers for the book collection.
//!
//! Each handler validates its input, makes one storage call, and maps the
//! outcome to a response. Validation failures return before storage is
//! touched.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use inout_db::StoreError;
use inout_http::error::{AppError, AppResult};
use serde_json::Value;

use super::models::{Book, BookPatch, CreatedBook};
use super::store::SharedBookStore;
use super::validation::{self, CREATE_KEYS, UPDATE_KEYS};
use crate::utils;

const BOOK_NOT_FOUND: &str = "Book not found";

/// Routes relative to `/api`, with `store` attached as state.
pub fn router(store: SharedBookStore) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(store)
}

/// Classify a storage failure; absence is a 404, anything else a 500.
fn storage_failure(operation: &'static str, err: StoreError) -> AppError {
    match err {
        StoreError::NoMatchingItem => {
            tracing::info!(operation, "Book not found");
            AppError::not_found(BOOK_NOT_FOUND)
        }
        StoreError::DuplicateKey(id) => {
            tracing::warn!(operation, book_id = id, "book id already taken");
            AppError::conflict("Book already exists")
        }
        other => {
            tracing::error!(operation, error = %other, "storage failure");
            AppError::Internal(anyhow::Error::new(other).context(format!("books.{operation}")))
        }
    }
}

/// GET /api/books
async fn list_books(State(store): State<SharedBookStore>) -> AppResult<Json<Vec<Book>>> {
    let books = store
        .find()
        .await
        .map_err(|err| storage_failure("find", err))?;

    tracing::debug!(count = books.len(), "listed books");
    Ok(Json(books))
}

/// GET /api/books/{id}
async fn get_book(
    State(store): State<SharedBookStore>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Book>> {
    let id = validation::parse_id(&raw_id)?;

    let book = store
        .find_one(id)
        .await
        .map_err(|err| storage_failure("find_one", err))?
        .ok_or_else(|| {
            tracing::info!(book_id = id, "Book not found");
            AppError::not_found(BOOK_NOT_FOUND)
        })?;

    tracing::debug!(book_id = id, "fetched book");
    Ok(Json(book))
}

/// POST /api/books
async fn create_book(
    State(store): State<SharedBookStore>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreatedBook>)> {
    let body = utils::json_body(payload)?;
    let book: Book = validation::exact_shape(body, CREATE_KEYS)?;

    let result = store
        .insert_one(book)
        .await
        .map_err(|err| storage_failure("insert_one", err))?;

    let id = result.inserted_key().ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("insert reported no stored record"))
    })?;

    tracing::info!(book_id = id, "book created");
    Ok((StatusCode::CREATED, Json(CreatedBook { id })))
}

/// PUT /api/books/{id}
async fn update_book(
    State(store): State<SharedBookStore>,
    Path(raw_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<StatusCode> {
    let id = validation::parse_id(&raw_id)?;
    let body = utils::json_body(payload)?;
    let patch: BookPatch = validation::exact_shape(body, UPDATE_KEYS)?;

    let result = store
        .update_one(id, patch)
        .await
        .map_err(|err| storage_failure("update_one", err))?;

    tracing::info!(
        book_id = id,
        modified = result.modified_count,
        "book updated"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/books/{id}
///
/// The id is read like the other handlers read it, but an id without digits
/// is not a 400: it matches no record and ends as "Book not found".
async fn delete_book(
    State(store): State<SharedBookStore>,
    Path(raw_id): Path<String>,
) -> AppResult<StatusCode> {
    let Some(id) = validation::leading_integer(&raw_id) else {
        return Err(storage_failure("delete_one", StoreError::NoMatchingItem));
    };

    store
        .delete_one(id)
        .await
        .map_err(|err| storage_failure("delete_one", err))?;

    tracing::info!(book_id = id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
