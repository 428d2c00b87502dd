//! Diesel-backed read-only book catalog.

use async_trait::async_trait;
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::domain::ports::{BookPersistenceError, BookRepository};
use crate::domain::{Book, Isbn};

use super::error_map::map_diesel_error;
use super::models::BookRow;
use super::pool::DbPool;
use super::schema::books;

/// Book repository persisting to SQLite through Diesel.
#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    /// Create a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run<T, F>(&self, op: F) -> Result<T, BookPersistenceError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T, BookPersistenceError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|error| BookPersistenceError::connection(error.to_string()))?;
            op(&mut conn)
        })
        .await
        .map_err(|error| BookPersistenceError::query(format!("blocking task failed: {error}")))?
    }
}

fn into_domain(row: BookRow) -> Result<Book, BookPersistenceError> {
    row.into_domain()
        .map_err(|error| BookPersistenceError::query(error.to_string()))
}

#[async_trait]
impl BookRepository for DieselBookRepository {
    async fn search(&self, query: &str) -> Result<Vec<Book>, BookPersistenceError> {
        // SQLite LIKE is case-insensitive for ASCII, which is the contract
        // for catalog search.
        let pattern = format!("%{query}%");
        self.run(move |conn| {
            books::table
                .filter(
                    books::title
                        .like(&pattern)
                        .or(books::author.like(&pattern))
                        .or(books::isbn.like(&pattern)),
                )
                .select(BookRow::as_select())
                .load::<BookRow>(conn)
                .map_err(|error| {
                    map_diesel_error(
                        error,
                        BookPersistenceError::connection,
                        BookPersistenceError::query,
                    )
                })?
                .into_iter()
                .map(into_domain)
                .collect()
        })
        .await
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, BookPersistenceError> {
        let key = isbn.as_str().to_owned();
        self.run(move |conn| {
            books::table
                .find(&key)
                .select(BookRow::as_select())
                .first::<BookRow>(conn)
                .optional()
                .map_err(|error| {
                    map_diesel_error(
                        error,
                        BookPersistenceError::connection,
                        BookPersistenceError::query,
                    )
                })?
                .map(into_domain)
                .transpose()
        })
        .await
    }
}
