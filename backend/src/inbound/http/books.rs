//! Book read handlers: detail view, review listing, machine endpoint.
//!
//! The detail view carries two average-rating figures that are never merged:
//! the external service's (a string, `"N/A"` when unavailable) and the
//! locally computed aggregate. The machine endpoint exposes only the local
//! aggregate.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BookDetail, BookRecord, Error, Isbn, RatingSummary};
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::reviews::{ReviewForm, ReviewResponse, submit_for_isbn};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const NOT_AVAILABLE: &str = "N/A";

/// Detail view payload for `/book/{isbn}`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDetailResponse {
    /// Book ISBN.
    pub isbn: String,
    /// Book title.
    pub title: String,
    /// Book author.
    pub author: String,
    /// Stored publication year.
    pub year: i32,
    /// Year after the merge rule: the enricher's published year when it
    /// returned one, otherwise the stored year.
    pub published_year: i32,
    /// External average rating, or `"N/A"`.
    pub average_rating: String,
    /// External ratings count, or `"N/A"`.
    pub ratings_count: String,
    /// Locally computed aggregate over stored reviews.
    pub local_rating: RatingSummary,
    /// Stored reviews.
    pub reviews: Vec<ReviewResponse>,
}

impl From<&BookDetail> for BookDetailResponse {
    fn from(detail: &BookDetail) -> Self {
        Self {
            isbn: detail.book.isbn().to_string(),
            title: detail.book.title().to_owned(),
            author: detail.book.author().to_owned(),
            year: detail.book.year(),
            published_year: detail.published_year,
            average_rating: detail
                .external_average_rating
                .map_or_else(|| NOT_AVAILABLE.to_owned(), |r| r.to_string()),
            ratings_count: detail
                .external_ratings_count
                .map_or_else(|| NOT_AVAILABLE.to_owned(), |c| c.to_string()),
            local_rating: detail.local_rating,
            reviews: detail.reviews.iter().map(ReviewResponse::from).collect(),
        }
    }
}

/// Machine-readable record for `/api/{isbn}`.
///
/// `averageRating` is the locally computed mean, `0.0` when unreviewed; the
/// external enrichment figure is deliberately absent from this shape.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRecordResponse {
    /// Book title.
    pub title: String,
    /// Book author.
    pub author: String,
    /// Stored publication year, stringified.
    pub published_date: String,
    /// Book ISBN.
    #[serde(rename = "ISBN")]
    pub isbn: String,
    /// Number of stored reviews.
    pub review_count: i64,
    /// Mean of stored ratings, `0.0` when there are none.
    pub average_rating: f64,
}

impl From<&BookRecord> for BookRecordResponse {
    fn from(record: &BookRecord) -> Self {
        Self {
            title: record.book.title().to_owned(),
            author: record.book.author().to_owned(),
            published_date: record.book.year().to_string(),
            isbn: record.book.isbn().to_string(),
            review_count: record.local_rating.count,
            average_rating: record.local_rating.average,
        }
    }
}

fn parse_isbn(raw: &str) -> Result<Isbn, Error> {
    Isbn::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

/// List a book's reviews.
#[utoipa::path(
    get,
    path = "/view_reviews/{isbn}",
    params(("isbn" = String, Path, description = "ISBN of the book")),
    responses(
        (status = 200, description = "Reviews, possibly empty", body = [ReviewResponse]),
        (status = 404, description = "Book not found", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["reviews"],
    operation_id = "viewReviews"
)]
#[get("/view_reviews/{isbn}")]
pub async fn view_reviews(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    let isbn = parse_isbn(&path)?;
    let reviews = state.reviews.list(&isbn).await?;
    Ok(web::Json(
        reviews.iter().map(ReviewResponse::from).collect(),
    ))
}

/// Book detail view with enrichment and local reviews.
#[utoipa::path(
    get,
    path = "/book/{isbn}",
    params(("isbn" = String, Path, description = "ISBN of the book")),
    responses(
        (status = 200, description = "Merged detail view", body = BookDetailResponse),
        (status = 404, description = "Book not found", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["catalog"],
    operation_id = "bookDetail"
)]
#[get("/book/{isbn}")]
pub async fn book_detail(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookDetailResponse>> {
    let isbn = parse_isbn(&path)?;
    let detail = state.catalogue.book_detail(&isbn).await?;
    Ok(web::Json(BookDetailResponse::from(&detail)))
}

/// Submit a review from the book page.
#[post("/book/{isbn}")]
pub async fn book_submit_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<ReviewForm>,
) -> ApiResult<HttpResponse> {
    submit_for_isbn(&state, &session, &path, &form).await
}

/// Machine-readable book record.
#[utoipa::path(
    get,
    path = "/api/{isbn}",
    params(("isbn" = String, Path, description = "ISBN of the book")),
    responses(
        (status = 200, description = "Local record", body = BookRecordResponse),
        (status = 404, description = "Book not found", body = crate::inbound::http::error::ApiError),
        (status = 500, description = "Unexpected failure", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["catalog"],
    operation_id = "bookRecord"
)]
#[get("/api/{isbn}")]
pub async fn book_record(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookRecordResponse>> {
    let isbn = parse_isbn(&path)?;
    let record = state.catalogue.book_record(&isbn).await?;
    Ok(web::Json(BookRecordResponse::from(&record)))
}
