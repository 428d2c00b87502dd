//! Review model: one rating-and-comment entry per user per book.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::book::Isbn;
use super::user::UserId;

/// Validation errors returned by [`Rating::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingValidationError {
    /// Rating fell outside the accepted 1..=5 range.
    #[error("rating must be between {min} and {max}")]
    OutOfRange {
        /// Lowest accepted rating.
        min: i32,
        /// Highest accepted rating.
        max: i32,
    },
}

const RATING_MIN: i32 = 1;
const RATING_MAX: i32 = 5;

/// Integer star rating in 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Rating(i32);

impl Rating {
    /// Validate and construct a [`Rating`].
    pub fn new(value: i32) -> Result<Self, RatingValidationError> {
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(RatingValidationError::OutOfRange {
                min: RATING_MIN,
                max: RATING_MAX,
            });
        }
        Ok(Self(value))
    }

    /// Underlying integer value.
    pub fn value(self) -> i32 {
        self.0
    }
}

impl From<Rating> for i32 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl TryFrom<i32> for Rating {
    type Error = RatingValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stored review.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    id: Uuid,
    isbn: Isbn,
    user_id: UserId,
    rating: Rating,
    comment: String,
    created_at: DateTime<Utc>,
}

impl Review {
    /// Create a fresh review with a random id, stamped with the current time.
    ///
    /// The insert timestamp is captured here rather than in the database so
    /// the value returned to the submitting user matches what was stored.
    pub fn new(isbn: Isbn, user_id: UserId, rating: Rating, comment: impl Into<String>) -> Self {
        Self::from_parts(Uuid::new_v4(), isbn, user_id, rating, comment, Utc::now())
    }

    /// Reassemble a review from stored fields.
    pub fn from_parts(
        id: Uuid,
        isbn: Isbn,
        user_id: UserId,
        rating: Rating,
        comment: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            isbn,
            user_id,
            rating,
            comment: comment.into(),
            created_at,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// Reviewed book.
    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    /// Submitting user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Star rating.
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Free-text comment.
    pub fn comment(&self) -> &str {
        self.comment.as_str()
    }

    /// Submission timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Locally computed aggregate over a book's stored reviews.
///
/// A book with no reviews aggregates to `(count = 0, average = 0.0)` rather
/// than an error or NaN; callers rely on that exact shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    /// Number of stored reviews.
    pub count: i64,
    /// Mean of the stored ratings, `0.0` when there are none.
    pub average: f64,
}

impl RatingSummary {
    /// Aggregate for a book with no reviews.
    pub fn empty() -> Self {
        Self {
            count: 0,
            average: 0.0,
        }
    }

    /// Compute the aggregate from raw rating values.
    pub fn from_ratings(ratings: &[i32]) -> Self {
        if ratings.is_empty() {
            return Self::empty();
        }
        let count = ratings.len() as i64;
        let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
        Self {
            count,
            average: sum as f64 / count as f64,
        }
    }
}
