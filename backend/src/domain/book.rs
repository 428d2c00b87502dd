//! Catalog book model.
//!
//! Books are read-only reference data keyed by ISBN; this system never
//! creates or mutates them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`Isbn::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IsbnValidationError {
    /// Value was empty after trimming.
    #[error("ISBN must not be empty")]
    Empty,
    /// Value contained characters outside digits, hyphens, and `X`.
    #[error("ISBN may only contain digits, hyphens, or a trailing X")]
    InvalidCharacters,
}

/// Unique identifier for a book edition, used as the primary key for catalog
/// and review lookups.
///
/// Validation is deliberately shallow: the catalog is the authority on which
/// ISBNs exist, so this type only rejects input that could never be one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// Validate and construct an [`Isbn`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, IsbnValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IsbnValidationError::Empty);
        }
        let valid = trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-' || c == 'X' || c == 'x');
        if !valid {
            return Err(IsbnValidationError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the ISBN as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Isbn> for String {
    fn from(value: Isbn) -> Self {
        value.0
    }
}

impl TryFrom<String> for Isbn {
    type Error = IsbnValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stored catalog book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    isbn: Isbn,
    title: String,
    author: String,
    year: i32,
}

impl Book {
    /// Assemble a book from stored fields.
    pub fn new(isbn: Isbn, title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            isbn,
            title: title.into(),
            author: author.into(),
            year,
        }
    }

    /// Primary key.
    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    /// Book title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Book author.
    pub fn author(&self) -> &str {
        self.author.as_str()
    }

    /// Stored publication year.
    pub fn year(&self) -> i32 {
        self.year
    }
}
