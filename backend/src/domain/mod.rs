//! Domain primitives, ports, and services.
//!
//! Everything in this module is transport agnostic: inbound adapters parse
//! requests into these types, outbound adapters implement the port traits,
//! and the services in between hold the workflow rules (one review per user
//! per book, fail-soft enrichment, identical credential failures).

pub mod auth;
pub mod book;
pub mod catalogue;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod password;
pub mod ports;
pub mod review;
pub mod reviews;
pub mod user;

pub use self::auth::{LoginCredentials, RegistrationRequest};
pub use self::book::{Book, Isbn};
pub use self::catalogue::{BookDetail, BookRecord, CatalogueService, EnrichedBook};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::IdentityService;
pub use self::metadata::VolumeMetadata;
pub use self::review::{Rating, RatingSummary, Review};
pub use self::reviews::ReviewService;
pub use self::user::{User, UserId, Username};

/// Map an unexpected adapter failure to a redacted internal error, logging
/// the full detail at the point of loss.
pub(crate) fn storage_failure(error: impl std::fmt::Display) -> Error {
    tracing::error!(error = %error, "unexpected storage failure");
    Error::internal("unexpected storage failure")
}
