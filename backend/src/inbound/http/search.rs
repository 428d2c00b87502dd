//! Catalog search handlers.
//!
//! POST runs the search and enriches each hit from the external metadata
//! service. Hits whose lookup failed are already gone by this point; for the
//! rest, absent external figures are rendered as the literal `"N/A"`. The
//! query is remembered in the session so GET can replay the form state.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::EnrichedBook;
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const NOT_AVAILABLE: &str = "N/A";

/// Search form fields.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchForm {
    /// Free-text query matched against title, author, and ISBN.
    #[serde(default)]
    pub search_query: String,
}

/// Form state replayed by GET.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchFormState {
    /// The session's remembered query, empty when none.
    pub search_query: String,
}

/// One enriched search hit.
///
/// External figures are stringified so missing values can carry the `"N/A"`
/// placeholder; the locally computed aggregate is not part of search results.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Book ISBN.
    pub isbn: String,
    /// Book title.
    pub title: String,
    /// Book author.
    pub author: String,
    /// Stored publication year.
    pub year: i32,
    /// External average rating, or `"N/A"`.
    pub average_rating: String,
    /// External ratings count, or `"N/A"`.
    pub ratings_count: String,
}

impl From<&EnrichedBook> for SearchHit {
    fn from(hit: &EnrichedBook) -> Self {
        Self {
            isbn: hit.book.isbn().to_string(),
            title: hit.book.title().to_owned(),
            author: hit.book.author().to_owned(),
            year: hit.book.year(),
            average_rating: hit
                .metadata
                .average_rating
                .map_or_else(|| NOT_AVAILABLE.to_owned(), |r| r.to_string()),
            ratings_count: hit
                .metadata
                .ratings_count
                .map_or_else(|| NOT_AVAILABLE.to_owned(), |c| c.to_string()),
        }
    }
}

/// Search results payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Query that produced these results.
    pub search_query: String,
    /// Enriched hits in storage order.
    pub books: Vec<SearchHit>,
}

/// Replay the remembered search query.
#[get("/search")]
pub async fn search_form(session: SessionContext) -> ApiResult<web::Json<SearchFormState>> {
    let search_query = session.remembered_search()?.unwrap_or_default();
    Ok(web::Json(SearchFormState { search_query }))
}

/// Run a search and enrich each hit.
#[utoipa::path(
    post,
    path = "/search",
    responses((status = 200, description = "Enriched search results", body = SearchResults)),
    tags = ["catalog"],
    operation_id = "search"
)]
#[post("/search")]
pub async fn run_search(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<SearchForm>,
) -> ApiResult<web::Json<SearchResults>> {
    session.remember_search(&form.search_query)?;
    let hits = state.catalogue.search(&form.search_query).await?;
    Ok(web::Json(SearchResults {
        search_query: form.search_query.clone(),
        books: hits.iter().map(SearchHit::from).collect(),
    }))
}
