//! Catalogue service: search, enrichment, and the book read paths.
//!
//! Enrichment is fail-soft: a metadata failure never fails the request. The
//! two read paths degrade differently, though. Search drops the hit whose
//! lookup failed and logs the omission; the detail view keeps the book and
//! falls back to an unavailable snapshot. The machine-readable record
//! deliberately ignores the external service and reports only the locally
//! computed aggregate.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::warn;

use super::book::{Book, Isbn};
use super::error::Error;
use super::metadata::VolumeMetadata;
use super::ports::{BookRepository, MetadataSource, ReviewRepository};
use super::review::{RatingSummary, Review};
use crate::domain::storage_failure;

const BOOK_NOT_FOUND: &str = "book not found";

/// Search hit with its per-request metadata snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedBook {
    /// Stored catalog fields.
    pub book: Book,
    /// External snapshot; `unavailable()` when the lookup failed.
    pub metadata: VolumeMetadata,
}

/// Detail view combining stored fields, enrichment, and local reviews.
///
/// The external average rating and the local [`RatingSummary`] are distinct
/// figures and stay separate fields; they are never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetail {
    /// Stored catalog fields.
    pub book: Book,
    /// Publication year after the merge rule: the enricher's published year
    /// when it returned one, otherwise the stored year.
    pub published_year: i32,
    /// External average rating; rendered as "N/A" when absent.
    pub external_average_rating: Option<f32>,
    /// External ratings count; rendered as "N/A" when absent.
    pub external_ratings_count: Option<i64>,
    /// Locally computed aggregate over stored reviews.
    pub local_rating: RatingSummary,
    /// Stored reviews for the book.
    pub reviews: Vec<Review>,
}

/// Machine-readable record served by the API endpoint. Local data only.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    /// Stored catalog fields.
    pub book: Book,
    /// Locally computed aggregate over stored reviews.
    pub local_rating: RatingSummary,
}

/// Read-path use-cases over the catalog, reviews, and the metadata source.
#[derive(Clone)]
pub struct CatalogueService {
    books: Arc<dyn BookRepository>,
    reviews: Arc<dyn ReviewRepository>,
    metadata: Arc<dyn MetadataSource>,
}

impl CatalogueService {
    /// Create a service over the given ports.
    pub fn new(
        books: Arc<dyn BookRepository>,
        reviews: Arc<dyn ReviewRepository>,
        metadata: Arc<dyn MetadataSource>,
    ) -> Self {
        Self {
            books,
            reviews,
            metadata,
        }
    }

    /// Free-text search with per-hit enrichment.
    ///
    /// Enrichment calls run concurrently, one external round trip per hit.
    /// A hit whose lookup fails is omitted from the results; the omission is
    /// logged and cannot abort the batch. Found volumes with missing fields
    /// stay in, carrying an absent figure per field.
    pub async fn search(&self, query: &str) -> Result<Vec<EnrichedBook>, Error> {
        let books = self.books.search(query).await.map_err(storage_failure)?;
        let lookups = books.into_iter().map(|book| async move {
            match self.metadata.fetch(book.isbn()).await {
                Ok(metadata) => Some(EnrichedBook { book, metadata }),
                Err(error) => {
                    warn!(isbn = %book.isbn(), %error, "metadata lookup failed; omitting hit");
                    None
                }
            }
        });
        Ok(join_all(lookups).await.into_iter().flatten().collect())
    }

    /// Exact-ISBN detail view with merged enrichment and local reviews.
    pub async fn book_detail(&self, isbn: &Isbn) -> Result<BookDetail, Error> {
        let book = self
            .books
            .find_by_isbn(isbn)
            .await
            .map_err(storage_failure)?
            .ok_or_else(|| Error::not_found(BOOK_NOT_FOUND))?;

        let metadata = self.enrich(isbn).await;
        let reviews = self
            .reviews
            .list_for_book(isbn)
            .await
            .map_err(storage_failure)?;
        let local_rating = self
            .reviews
            .aggregate(isbn)
            .await
            .map_err(storage_failure)?;

        let published_year = metadata.published_year.unwrap_or_else(|| book.year());
        Ok(BookDetail {
            published_year,
            external_average_rating: metadata.average_rating,
            external_ratings_count: metadata.ratings_count,
            local_rating,
            reviews,
            book,
        })
    }

    /// Machine-readable record: stored fields plus the local aggregate.
    pub async fn book_record(&self, isbn: &Isbn) -> Result<BookRecord, Error> {
        let book = self
            .books
            .find_by_isbn(isbn)
            .await
            .map_err(storage_failure)?
            .ok_or_else(|| Error::not_found(BOOK_NOT_FOUND))?;
        let local_rating = self
            .reviews
            .aggregate(isbn)
            .await
            .map_err(storage_failure)?;
        Ok(BookRecord { book, local_rating })
    }

    async fn enrich(&self, isbn: &Isbn) -> VolumeMetadata {
        match self.metadata.fetch(isbn).await {
            Ok(metadata) => metadata,
            Err(error) => {
                warn!(%isbn, %error, "metadata lookup failed; serving placeholders");
                VolumeMetadata::unavailable()
            }
        }
    }
}
