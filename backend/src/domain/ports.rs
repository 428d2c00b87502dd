//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the relational store and the external metadata service). Each trait
//! exposes strongly typed errors so adapters map their failures into
//! predictable variants instead of returning opaque strings.

use async_trait::async_trait;
use thiserror::Error;

use super::book::{Book, Isbn};
use super::metadata::VolumeMetadata;
use super::review::{RatingSummary, Review};
use super::user::{User, UserId, Username};

/// Errors surfaced by the user persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserPersistenceError {
    /// Another account already holds this username (case-insensitively).
    /// Raised by the storage layer's unique index, so racing registrations
    /// surface here even when the pre-check passed.
    #[error("username already taken")]
    DuplicateUsername,
    /// Database connectivity failures.
    #[error("user persistence connection failed: {message}")]
    Connection {
        /// Adapter failure description.
        message: String,
    },
    /// Query execution failures.
    #[error("user persistence query failed: {message}")]
    Query {
        /// Adapter failure description.
        message: String,
    },
}

impl UserPersistenceError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Store of registered users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account inside one transaction.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Exact (case-sensitive) username lookup, used by login.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Case-insensitive username lookup, used by the registration pre-check.
    async fn find_by_username_ci(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;
}

/// Errors surfaced by the book persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookPersistenceError {
    /// Database connectivity failures.
    #[error("book persistence connection failed: {message}")]
    Connection {
        /// Adapter failure description.
        message: String,
    },
    /// Query execution failures.
    #[error("book persistence query failed: {message}")]
    Query {
        /// Adapter failure description.
        message: String,
    },
}

impl BookPersistenceError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Read-only catalog of books.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Case-insensitive substring match over title, author, and ISBN, in
    /// storage order.
    async fn search(&self, query: &str) -> Result<Vec<Book>, BookPersistenceError>;

    /// Exact ISBN lookup.
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, BookPersistenceError>;
}

/// Errors surfaced by the review persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewPersistenceError {
    /// The `(isbn, user)` unique index rejected the insert. This is the
    /// conflict signal for the duplicate-check race: the pre-check may pass
    /// and the insert still land second.
    #[error("user already reviewed this book")]
    Duplicate,
    /// Database connectivity failures.
    #[error("review persistence connection failed: {message}")]
    Connection {
        /// Adapter failure description.
        message: String,
    },
    /// Query execution failures.
    #[error("review persistence query failed: {message}")]
    Query {
        /// Adapter failure description.
        message: String,
    },
}

impl ReviewPersistenceError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Store of submitted reviews.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a review inside one transaction, rolled back on any failure.
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError>;

    /// Find the review a user already submitted for a book, if any.
    async fn find_for_user(
        &self,
        isbn: &Isbn,
        user_id: &UserId,
    ) -> Result<Option<Review>, ReviewPersistenceError>;

    /// All reviews for a book; an empty list is a valid result.
    async fn list_for_book(&self, isbn: &Isbn) -> Result<Vec<Review>, ReviewPersistenceError>;

    /// Count and mean rating over the book's reviews; `(0, 0.0)` when none.
    async fn aggregate(&self, isbn: &Isbn) -> Result<RatingSummary, ReviewPersistenceError>;
}

/// Errors surfaced by the external metadata adapter.
///
/// Every variant is handled fail-soft by the catalogue service; none of them
/// propagate to a request as a hard failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataSourceError {
    /// Network-level failure (DNS, connect, timeout).
    #[error("metadata transport failed: {message}")]
    Transport {
        /// Transport failure description.
        message: String,
    },
    /// The service answered with a non-success status.
    #[error("metadata service returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
    /// The response body did not decode as the expected shape.
    #[error("metadata response malformed: {message}")]
    Decode {
        /// Decode failure description.
        message: String,
    },
    /// The service matched no volume for the ISBN.
    #[error("no volume matched the ISBN")]
    NoMatch,
}

impl MetadataSourceError {
    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for decode failures.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Helper for HTTP status failures.
    pub fn status(status: u16) -> Self {
        Self::Status { status }
    }
}

/// External book-metadata lookup.
///
/// One invocation performs exactly one outbound round trip; no retry, no
/// caching, no batching.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch the first matching volume's rating and publication data.
    async fn fetch(&self, isbn: &Isbn) -> Result<VolumeMetadata, MetadataSourceError>;
}
