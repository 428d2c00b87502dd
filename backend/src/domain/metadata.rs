//! External volume metadata snapshot.
//!
//! Ephemeral, per-request data fetched from the external book-metadata
//! service and merged into book views. Never persisted.

/// Rating and publication data for one volume, as reported by the external
/// service. Any field the service omits stays `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VolumeMetadata {
    /// Average rating reported by the external service.
    pub average_rating: Option<f32>,
    /// Number of external ratings behind the average.
    pub ratings_count: Option<i64>,
    /// Publication year extracted from the service's `publishedDate`.
    pub published_year: Option<i32>,
}

impl VolumeMetadata {
    /// Snapshot used when the lookup failed or found no match; callers
    /// render placeholders instead of failing the request.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Whether the lookup produced any usable field.
    pub fn is_available(&self) -> bool {
        self.average_rating.is_some()
            || self.ratings_count.is_some()
            || self.published_year.is_some()
    }
}

/// Extract the leading four-digit year from a `publishedDate` value such as
/// `1998`, `1998-07-01`, or `1998-07`.
pub fn published_year(date: &str) -> Option<i32> {
    date.get(0..4)?.parse().ok()
}
