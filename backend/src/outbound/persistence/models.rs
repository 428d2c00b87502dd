//! Row types bridging Diesel and the domain models.
//!
//! Rows are owned so they can cross the `spawn_blocking` boundary. SQLite
//! stores timestamps without an offset; conversions pin them to UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Book, Isbn, Rating, Review, User, UserId, Username};

use super::schema::{books, reviews, users};

/// Raised when a stored row no longer satisfies a domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {table} row {key} is invalid: {message}")]
pub(crate) struct RowConversionError {
    table: &'static str,
    key: String,
    message: String,
}

impl RowConversionError {
    fn new(table: &'static str, key: impl Into<String>, message: impl ToString) -> Self {
        Self {
            table,
            key: key.into(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserRow {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, RowConversionError> {
        let key = self.id.clone();
        let id = UserId::new(&self.id).map_err(|e| RowConversionError::new("users", &key, e))?;
        let username =
            Username::new(&self.username).map_err(|e| RowConversionError::new("users", &key, e))?;
        Ok(User::new(
            id,
            username,
            self.password_hash,
            utc(self.created_at),
        ))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

impl From<&User> for NewUserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            password_hash: user.password_hash().to_owned(),
            created_at: user.created_at().naive_utc(),
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct BookRow {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: i32,
}

impl BookRow {
    pub(crate) fn into_domain(self) -> Result<Book, RowConversionError> {
        let isbn =
            Isbn::new(&self.isbn).map_err(|e| RowConversionError::new("books", &self.isbn, e))?;
        Ok(Book::new(isbn, self.title, self.author, self.year))
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ReviewRow {
    pub id: String,
    pub isbn: String,
    pub user_id: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

impl ReviewRow {
    pub(crate) fn into_domain(self) -> Result<Review, RowConversionError> {
        let key = self.id.clone();
        let id =
            Uuid::parse_str(&self.id).map_err(|e| RowConversionError::new("reviews", &key, e))?;
        let isbn = Isbn::new(&self.isbn).map_err(|e| RowConversionError::new("reviews", &key, e))?;
        let user_id =
            UserId::new(&self.user_id).map_err(|e| RowConversionError::new("reviews", &key, e))?;
        let rating =
            Rating::new(self.rating).map_err(|e| RowConversionError::new("reviews", &key, e))?;
        Ok(Review::from_parts(
            id,
            isbn,
            user_id,
            rating,
            self.comment,
            utc(self.created_at),
        ))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow {
    pub id: String,
    pub isbn: String,
    pub user_id: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

impl From<&Review> for NewReviewRow {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id().to_string(),
            isbn: review.isbn().to_string(),
            user_id: review.user_id().to_string(),
            rating: review.rating().value(),
            comment: review.comment().to_owned(),
            created_at: review.created_at().naive_utc(),
        }
    }
}

fn utc(naive: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(naive, Utc)
}
