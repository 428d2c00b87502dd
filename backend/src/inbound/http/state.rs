//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain services and remain testable with stub port implementations.

use std::sync::Arc;

use crate::domain::ports::{BookRepository, MetadataSource, ReviewRepository, UserRepository};
use crate::domain::{CatalogueService, IdentityService, ReviewService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and login use-cases.
    pub identity: IdentityService,
    /// Search and book read paths.
    pub catalogue: CatalogueService,
    /// Review submission and listings.
    pub reviews: ReviewService,
}

impl HttpState {
    /// Wire the domain services from their ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        books: Arc<dyn BookRepository>,
        reviews: Arc<dyn ReviewRepository>,
        metadata: Arc<dyn MetadataSource>,
    ) -> Self {
        Self {
            identity: IdentityService::new(users),
            catalogue: CatalogueService::new(books.clone(), reviews.clone(), metadata),
            reviews: ReviewService::new(reviews, books),
        }
    }
}
