//! OpenAPI documentation configuration.
//!
//! Aggregates the annotated HTTP paths and the request/response schemas into
//! one document. Swagger UI is deliberately not mounted; the document exists
//! for external tooling and contract review.

use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

use crate::domain::error::ErrorCode;
use crate::domain::review::RatingSummary;
use crate::inbound::http::auth::{CredentialsForm, SessionStatus, UserResponse};
use crate::inbound::http::books::{BookDetailResponse, BookRecordResponse};
use crate::inbound::http::error::ApiError;
use crate::inbound::http::reviews::{ReviewForm, ReviewResponse};
use crate::inbound::http::search::{SearchForm, SearchFormState, SearchHit, SearchResults};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the review service API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bookrack API",
        description = "Catalog search, book reviews, and externally enriched book views."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::login_status,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::register,
        crate::inbound::http::search::run_search,
        crate::inbound::http::reviews::submit_review_from_search,
        crate::inbound::http::books::view_reviews,
        crate::inbound::http::books::book_detail,
        crate::inbound::http::books::book_record,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        CredentialsForm,
        UserResponse,
        SessionStatus,
        SearchForm,
        SearchFormState,
        SearchHit,
        SearchResults,
        ReviewForm,
        ReviewResponse,
        BookDetailResponse,
        BookRecordResponse,
        RatingSummary,
    )),
    tags(
        (name = "auth", description = "Registration, login, and session state"),
        (name = "catalog", description = "Catalog search and book views"),
        (name = "reviews", description = "Review submission and listings")
    )
)]
pub struct ApiDoc;
