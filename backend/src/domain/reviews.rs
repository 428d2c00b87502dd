//! Review service: one review per user per book, plus listings.
//!
//! The duplicate invariant is enforced twice: a pre-check here, and the
//! storage layer's unique index for the race between check and insert. Both
//! outcomes surface as the same user-visible conflict.

use std::sync::Arc;

use tracing::info;

use super::book::Isbn;
use super::error::Error;
use super::ports::{BookRepository, ReviewPersistenceError, ReviewRepository};
use super::review::{Rating, RatingSummary, Review};
use super::user::UserId;
use crate::domain::storage_failure;

/// Conflict message shown whenever a second review targets the same book.
pub const ALREADY_REVIEWED: &str = "you have already submitted a review for this book";

const BOOK_NOT_FOUND: &str = "book not found";

/// Review submission and read use-cases.
#[derive(Clone)]
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    books: Arc<dyn BookRepository>,
}

impl ReviewService {
    /// Create a service over the given ports.
    pub fn new(reviews: Arc<dyn ReviewRepository>, books: Arc<dyn BookRepository>) -> Self {
        Self { reviews, books }
    }

    /// Submit a review for an authenticated user.
    ///
    /// The caller has already authenticated `user_id`; this method enforces
    /// the catalog and one-review-per-book invariants.
    pub async fn submit(
        &self,
        isbn: &Isbn,
        user_id: &UserId,
        rating: Rating,
        comment: String,
    ) -> Result<Review, Error> {
        let book = self
            .books
            .find_by_isbn(isbn)
            .await
            .map_err(storage_failure)?;
        if book.is_none() {
            return Err(Error::not_found(BOOK_NOT_FOUND));
        }

        let existing = self
            .reviews
            .find_for_user(isbn, user_id)
            .await
            .map_err(storage_failure)?;
        if existing.is_some() {
            return Err(Error::conflict(ALREADY_REVIEWED));
        }

        let review = Review::new(isbn.clone(), user_id.clone(), rating, comment);
        match self.reviews.insert(&review).await {
            Ok(()) => {
                info!(%isbn, user = %user_id, "stored review");
                Ok(review)
            }
            // The pre-check raced a concurrent submission; the unique index
            // is the authority and its violation means the same thing.
            Err(ReviewPersistenceError::Duplicate) => Err(Error::conflict(ALREADY_REVIEWED)),
            Err(error) => Err(storage_failure(error)),
        }
    }

    /// All reviews for a book. Missing books are `NotFound`; a book with no
    /// reviews yields an explicit empty list.
    pub async fn list(&self, isbn: &Isbn) -> Result<Vec<Review>, Error> {
        let book = self
            .books
            .find_by_isbn(isbn)
            .await
            .map_err(storage_failure)?;
        if book.is_none() {
            return Err(Error::not_found(BOOK_NOT_FOUND));
        }
        self.reviews
            .list_for_book(isbn)
            .await
            .map_err(storage_failure)
    }

    /// Count and mean rating for a book; `(0, 0.0)` when unreviewed.
    pub async fn aggregate(&self, isbn: &Isbn) -> Result<RatingSummary, Error> {
        self.reviews.aggregate(isbn).await.map_err(storage_failure)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for submission and the duplicate invariant.
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::book::Book;
    use crate::domain::ports::BookPersistenceError;

    struct StubBookRepository {
        books: Vec<Book>,
    }

    #[async_trait]
    impl BookRepository for StubBookRepository {
        async fn search(&self, _query: &str) -> Result<Vec<Book>, BookPersistenceError> {
            Ok(self.books.clone())
        }

        async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, BookPersistenceError> {
            Ok(self.books.iter().find(|b| b.isbn() == isbn).cloned())
        }
    }

    #[derive(Default)]
    struct StubReviewRepository {
        reviews: Mutex<Vec<Review>>,
        insert_failure: Mutex<Option<ReviewPersistenceError>>,
        hide_from_precheck: Mutex<bool>,
    }

    impl StubReviewRepository {
        fn fail_next_insert(&self, failure: ReviewPersistenceError) {
            *self.insert_failure.lock().expect("lock") = Some(failure);
        }

        /// Simulate the check/insert race: the pre-check sees nothing, but
        /// the unique index still rejects the insert.
        fn race_next_submission(&self) {
            *self.hide_from_precheck.lock().expect("lock") = true;
            self.fail_next_insert(ReviewPersistenceError::Duplicate);
        }
    }

    #[async_trait]
    impl ReviewRepository for StubReviewRepository {
        async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
            if let Some(failure) = self.insert_failure.lock().expect("lock").take() {
                return Err(failure);
            }
            self.reviews.lock().expect("lock").push(review.clone());
            Ok(())
        }

        async fn find_for_user(
            &self,
            isbn: &Isbn,
            user_id: &UserId,
        ) -> Result<Option<Review>, ReviewPersistenceError> {
            if *self.hide_from_precheck.lock().expect("lock") {
                return Ok(None);
            }
            Ok(self
                .reviews
                .lock()
                .expect("lock")
                .iter()
                .find(|r| r.isbn() == isbn && r.user_id() == user_id)
                .cloned())
        }

        async fn list_for_book(&self, isbn: &Isbn) -> Result<Vec<Review>, ReviewPersistenceError> {
            Ok(self
                .reviews
                .lock()
                .expect("lock")
                .iter()
                .filter(|r| r.isbn() == isbn)
                .cloned()
                .collect())
        }

        async fn aggregate(&self, isbn: &Isbn) -> Result<RatingSummary, ReviewPersistenceError> {
            let ratings: Vec<i32> = self
                .reviews
                .lock()
                .expect("lock")
                .iter()
                .filter(|r| r.isbn() == isbn)
                .map(|r| r.rating().value())
                .collect();
            Ok(RatingSummary::from_ratings(&ratings))
        }
    }

    fn isbn(raw: &str) -> Isbn {
        Isbn::new(raw).expect("valid isbn")
    }

    fn rating(value: i32) -> Rating {
        Rating::new(value).expect("valid rating")
    }

    fn service() -> (ReviewService, Arc<StubReviewRepository>) {
        let reviews = Arc::new(StubReviewRepository::default());
        let books = Arc::new(StubBookRepository {
            books: vec![Book::new(
                isbn("0380795272"),
                "Krondor: The Betrayal",
                "Raymond E. Feist",
                1998,
            )],
        });
        (ReviewService::new(reviews.clone(), books), reviews)
    }

    #[tokio::test]
    async fn submit_stores_a_review() {
        let (service, _reviews) = service();
        let user = UserId::random();

        let review = service
            .submit(&isbn("0380795272"), &user, rating(4), "great".into())
            .await
            .expect("submission succeeds");

        assert_eq!(review.rating().value(), 4);
        let listed = service.list(&isbn("0380795272")).await.expect("list");
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn second_review_for_same_pair_conflicts() {
        let (service, _reviews) = service();
        let user = UserId::random();
        let target = isbn("0380795272");

        service
            .submit(&target, &user, rating(4), "great".into())
            .await
            .expect("first submission succeeds");
        let err = service
            .submit(&target, &user, rating(2), "changed my mind".into())
            .await
            .expect_err("second must conflict");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), ALREADY_REVIEWED);
    }

    #[tokio::test]
    async fn racing_submission_still_surfaces_as_conflict() {
        let (service, reviews) = service();
        reviews.race_next_submission();

        let err = service
            .submit(&isbn("0380795272"), &UserId::random(), rating(5), "race".into())
            .await
            .expect_err("race must conflict");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), ALREADY_REVIEWED);
    }

    #[tokio::test]
    async fn different_users_may_review_the_same_book() {
        let (service, _reviews) = service();
        let target = isbn("0380795272");

        service
            .submit(&target, &UserId::random(), rating(3), "fine".into())
            .await
            .expect("first user");
        service
            .submit(&target, &UserId::random(), rating(5), "loved it".into())
            .await
            .expect("second user");

        let summary = service.aggregate(&target).await.expect("aggregate");
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average, 4.0);
    }

    #[tokio::test]
    async fn submitting_against_a_missing_book_is_not_found() {
        let (service, _reviews) = service();

        let err = service
            .submit(&isbn("9999999999"), &UserId::random(), rating(3), "?".into())
            .await
            .expect_err("missing book must 404");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn aggregate_of_unreviewed_book_is_zero() {
        let (service, _reviews) = service();

        let summary = service
            .aggregate(&isbn("0380795272"))
            .await
            .expect("aggregate succeeds");

        assert_eq!(summary, RatingSummary::empty());
    }

    #[tokio::test]
    async fn storage_failures_are_redacted() {
        let (service, reviews) = service();
        reviews.fail_next_insert(ReviewPersistenceError::connection("socket closed"));

        let err = service
            .submit(&isbn("0380795272"), &UserId::random(), rating(3), "x".into())
            .await
            .expect_err("failure expected");

        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(!err.message().contains("socket closed"));
    }
}
