//! Review submission handlers and DTOs.
//!
//! Both submission routes (from search results and from the book page) go
//! through [`submit_for_isbn`] so the authentication, validation, and
//! conflict mapping stay identical.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Isbn, Rating, Review};
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Review form fields.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewForm {
    /// Star rating, 1 to 5.
    pub rating: i32,
    /// Free-text comment.
    #[serde(default)]
    pub comment: String,
}

/// Stored review as returned to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    /// Review identifier.
    pub id: String,
    /// Reviewed book.
    pub isbn: String,
    /// Submitting user.
    pub user_id: String,
    /// Star rating.
    pub rating: i32,
    /// Free-text comment.
    pub comment: String,
    /// Submission timestamp (RFC 3339).
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id().to_string(),
            isbn: review.isbn().to_string(),
            user_id: review.user_id().to_string(),
            rating: review.rating().value(),
            comment: review.comment().to_owned(),
            created_at: review.created_at(),
        }
    }
}

/// Parse the path ISBN, require a session user, and submit the review.
pub(crate) async fn submit_for_isbn(
    state: &HttpState,
    session: &SessionContext,
    raw_isbn: &str,
    form: &ReviewForm,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let isbn = Isbn::new(raw_isbn).map_err(|err| Error::invalid_request(err.to_string()))?;
    let rating = Rating::new(form.rating).map_err(|err| Error::invalid_request(err.to_string()))?;
    let review = state
        .reviews
        .submit(&isbn, &user_id, rating, form.comment.clone())
        .await?;
    Ok(HttpResponse::Created().json(ReviewResponse::from(&review)))
}

/// Submit a review from the search-results page.
#[utoipa::path(
    post,
    path = "/submit_review_from_search/{isbn}",
    params(("isbn" = String, Path, description = "ISBN of the reviewed book")),
    responses(
        (status = 201, description = "Review stored", body = ReviewResponse),
        (status = 401, description = "Login required", body = crate::inbound::http::error::ApiError),
        (status = 404, description = "Book not found", body = crate::inbound::http::error::ApiError),
        (status = 409, description = "Already reviewed", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["reviews"],
    operation_id = "submitReviewFromSearch"
)]
#[post("/submit_review_from_search/{isbn}")]
pub async fn submit_review_from_search(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<ReviewForm>,
) -> ApiResult<HttpResponse> {
    submit_for_isbn(&state, &session, &path, &form).await
}
