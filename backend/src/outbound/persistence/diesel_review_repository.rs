//! Diesel-backed review store.

use async_trait::async_trait;
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::domain::ports::{ReviewPersistenceError, ReviewRepository};
use crate::domain::{Isbn, RatingSummary, Review, UserId};

use super::error_map::{is_unique_violation, map_diesel_error};
use super::models::{NewReviewRow, ReviewRow};
use super::pool::DbPool;
use super::schema::reviews;

/// Review repository persisting to SQLite through Diesel.
///
/// The `(isbn, user_id)` unique index is the authority on duplicates; its
/// violation surfaces as [`ReviewPersistenceError::Duplicate`] so racing
/// submissions resolve to a conflict rather than a second row.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run<T, F>(&self, op: F) -> Result<T, ReviewPersistenceError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T, ReviewPersistenceError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|error| ReviewPersistenceError::connection(error.to_string()))?;
            op(&mut conn)
        })
        .await
        .map_err(|error| ReviewPersistenceError::query(format!("blocking task failed: {error}")))?
    }
}

fn into_domain(row: ReviewRow) -> Result<Review, ReviewPersistenceError> {
    row.into_domain()
        .map_err(|error| ReviewPersistenceError::query(error.to_string()))
}

fn classify(error: diesel::result::Error) -> ReviewPersistenceError {
    map_diesel_error(
        error,
        ReviewPersistenceError::connection,
        ReviewPersistenceError::query,
    )
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        let row = NewReviewRow::from(review);
        self.run(move |conn| {
            conn.transaction(|conn| {
                diesel::insert_into(reviews::table)
                    .values(&row)
                    .execute(conn)
            })
            .map(|_| ())
            .map_err(|error| {
                if is_unique_violation(&error) {
                    ReviewPersistenceError::Duplicate
                } else {
                    classify(error)
                }
            })
        })
        .await
    }

    async fn find_for_user(
        &self,
        isbn: &Isbn,
        user_id: &UserId,
    ) -> Result<Option<Review>, ReviewPersistenceError> {
        let isbn = isbn.as_str().to_owned();
        let user = user_id.to_string();
        self.run(move |conn| {
            reviews::table
                .filter(reviews::isbn.eq(&isbn))
                .filter(reviews::user_id.eq(&user))
                .select(ReviewRow::as_select())
                .first::<ReviewRow>(conn)
                .optional()
                .map_err(classify)?
                .map(into_domain)
                .transpose()
        })
        .await
    }

    async fn list_for_book(&self, isbn: &Isbn) -> Result<Vec<Review>, ReviewPersistenceError> {
        let isbn = isbn.as_str().to_owned();
        self.run(move |conn| {
            reviews::table
                .filter(reviews::isbn.eq(&isbn))
                .order(reviews::created_at.asc())
                .select(ReviewRow::as_select())
                .load::<ReviewRow>(conn)
                .map_err(classify)?
                .into_iter()
                .map(into_domain)
                .collect()
        })
        .await
    }

    async fn aggregate(&self, isbn: &Isbn) -> Result<RatingSummary, ReviewPersistenceError> {
        // Loading the rating column keeps the arithmetic in one place; the
        // review counts here never justify pushing the mean into SQL.
        let isbn = isbn.as_str().to_owned();
        self.run(move |conn| {
            let ratings: Vec<i32> = reviews::table
                .filter(reviews::isbn.eq(&isbn))
                .select(reviews::rating)
                .load(conn)
                .map_err(classify)?;
            Ok(RatingSummary::from_ratings(&ratings))
        })
        .await
    }
}
