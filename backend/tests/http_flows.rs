//! End-to-end HTTP tests over the full route surface.
//!
//! Each test wires the real Diesel repositories onto an in-memory SQLite
//! database and substitutes the external metadata service with a stub, so
//! flows exercise the same code paths as production minus the network.

use std::sync::Arc;

use actix_web::cookie::{Cookie, Key};
use actix_web::{App, test, web};
use async_trait::async_trait;

use backend::domain::ports::{MetadataSource, MetadataSourceError};
use backend::domain::{Isbn, VolumeMetadata};
use backend::inbound::http::routes;
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::{
    DbPool, DieselBookRepository, DieselReviewRepository, DieselUserRepository,
};
use backend::server::session_middleware;

struct FixedMetadata(VolumeMetadata);

#[async_trait]
impl MetadataSource for FixedMetadata {
    async fn fetch(&self, _isbn: &Isbn) -> Result<VolumeMetadata, MetadataSourceError> {
        Ok(self.0)
    }
}

struct FailingMetadata;

#[async_trait]
impl MetadataSource for FailingMetadata {
    async fn fetch(&self, _isbn: &Isbn) -> Result<VolumeMetadata, MetadataSourceError> {
        Err(MetadataSourceError::transport("connection refused"))
    }
}

fn rich_metadata() -> Arc<dyn MetadataSource> {
    Arc::new(FixedMetadata(VolumeMetadata {
        average_rating: Some(4.5),
        ratings_count: Some(120),
        published_year: Some(2000),
    }))
}

fn no_metadata() -> Arc<dyn MetadataSource> {
    Arc::new(FailingMetadata)
}

fn sparse_metadata() -> Arc<dyn MetadataSource> {
    Arc::new(FixedMetadata(VolumeMetadata::unavailable()))
}

macro_rules! test_app {
    ($metadata:expr) => {{
        let pool = DbPool::new_in_memory().expect("in-memory pool");
        pool.run_migrations().expect("migrations apply");
        let state = HttpState::new(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselBookRepository::new(pool.clone())),
            Arc::new(DieselReviewRepository::new(pool)),
            $metadata,
        );
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(session_middleware(Key::generate(), false))
                .configure(routes::configure),
        )
        .await
    }};
}

fn session_cookie(
    resp: &actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

async fn post_form<S, B>(app: &S, uri: &str, form: &[(&str, &str)]) -> S::Response
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .set_form(form)
        .to_request();
    test::call_service(app, req).await
}

async fn register<S, B>(app: &S, username: &str, password: &str) -> S::Response
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    post_form(app, "/register", &[("username", username), ("password", password)]).await
}

async fn login<S, B>(app: &S, username: &str, password: &str) -> S::Response
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    post_form(app, "/login", &[("username", username), ("password", password)]).await
}

#[actix_web::test]
async fn register_login_review_and_read_back() {
    let app = test_app!(no_metadata());

    let resp = register(&app, "alice", "correct-horse").await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "alice");

    let resp = login(&app, "alice", "correct-horse").await;
    assert_eq!(resp.status(), 200);
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::get()
        .uri("/login")
        .cookie(cookie.clone())
        .to_request();
    let status: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["loggedIn"], true);

    let req = test::TestRequest::post()
        .uri("/submit_review_from_search/0380795272")
        .cookie(cookie.clone())
        .set_form([("rating", "5"), ("comment", "great fantasy")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    // Same user, same book: the duplicate check must reject the second one.
    let req = test::TestRequest::post()
        .uri("/submit_review_from_search/0380795272")
        .cookie(cookie.clone())
        .set_form([("rating", "2"), ("comment", "changed my mind")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "conflict");

    let req = test::TestRequest::get()
        .uri("/view_reviews/0380795272")
        .to_request();
    let reviews: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reviews.as_array().expect("array").len(), 1);
    assert_eq!(reviews[0]["rating"], 5);
    assert_eq!(reviews[0]["comment"], "great fantasy");

    let req = test::TestRequest::get().uri("/api/0380795272").to_request();
    let record: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(record["title"], "Krondor: The Betrayal");
    assert_eq!(record["ISBN"], "0380795272");
    assert_eq!(record["publishedDate"], "1998");
    assert_eq!(record["reviewCount"], 1);
    assert_eq!(record["averageRating"], 5.0);
}

#[actix_web::test]
async fn review_submission_requires_login() {
    let app = test_app!(no_metadata());
    let req = test::TestRequest::post()
        .uri("/submit_review_from_search/0380795272")
        .set_form([("rating", "4"), ("comment", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
async fn registration_conflicts_are_case_insensitive() {
    let app = test_app!(no_metadata());
    let resp = register(&app, "alice", "correct-horse").await;
    assert_eq!(resp.status(), 201);

    let resp = register(&app, "ALICE", "other-secret").await;
    assert_eq!(resp.status(), 409);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["message"], "username already exists");
}

#[actix_web::test]
async fn login_failures_are_indistinguishable() {
    let app = test_app!(no_metadata());
    let resp = register(&app, "alice", "correct-horse").await;
    assert_eq!(resp.status(), 201);

    let wrong_password = login(&app, "alice", "wrong-password").await;
    assert_eq!(wrong_password.status(), 401);
    let wrong_password: serde_json::Value = test::read_body_json(wrong_password).await;

    let unknown_user = login(&app, "nobody", "wrong-password").await;
    assert_eq!(unknown_user.status(), 401);
    let unknown_user: serde_json::Value = test::read_body_json(unknown_user).await;

    assert_eq!(wrong_password["code"], unknown_user["code"]);
    assert_eq!(wrong_password["message"], unknown_user["message"]);
}

#[actix_web::test]
async fn logout_clears_the_session() {
    let app = test_app!(no_metadata());
    register(&app, "alice", "correct-horse").await;
    let resp = login(&app, "alice", "correct-horse").await;
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::post()
        .uri("/logout")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let cleared = session_cookie(&resp);

    let req = test::TestRequest::get()
        .uri("/login")
        .cookie(cleared)
        .to_request();
    let status: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["loggedIn"], false);
}

#[actix_web::test]
async fn search_enriches_hits_and_remembers_the_query() {
    let app = test_app!(rich_metadata());

    let req = test::TestRequest::post()
        .uri("/search")
        .set_form([("search_query", "krondor")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let cookie = session_cookie(&resp);
    let results: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(results["searchQuery"], "krondor");
    let books = results["books"].as_array().expect("array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Krondor: The Betrayal");
    assert_eq!(books[0]["averageRating"], "4.5");
    assert_eq!(books[0]["ratingsCount"], "120");

    let req = test::TestRequest::get()
        .uri("/search")
        .cookie(cookie)
        .to_request();
    let form: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(form["searchQuery"], "krondor");
}

#[actix_web::test]
async fn search_omits_hits_the_metadata_outage_left_unenriched() {
    let app = test_app!(no_metadata());

    let req = test::TestRequest::post()
        .uri("/search")
        .set_form([("search_query", "dune")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let results: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(results["searchQuery"], "dune");
    let books = results["books"].as_array().expect("array");
    assert!(books.is_empty());
}

#[actix_web::test]
async fn search_renders_placeholders_for_missing_fields() {
    let app = test_app!(sparse_metadata());

    let req = test::TestRequest::post()
        .uri("/search")
        .set_form([("search_query", "dune")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let results: serde_json::Value = test::read_body_json(resp).await;
    let books = results["books"].as_array().expect("array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["averageRating"], "N/A");
    assert_eq!(books[0]["ratingsCount"], "N/A");
}

#[actix_web::test]
async fn book_detail_prefers_the_external_year() {
    let app = test_app!(rich_metadata());
    let req = test::TestRequest::get().uri("/book/0380795272").to_request();
    let detail: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["year"], 1998);
    assert_eq!(detail["publishedYear"], 2000);
    assert_eq!(detail["averageRating"], "4.5");
    assert_eq!(detail["ratingsCount"], "120");
    assert_eq!(detail["localRating"]["count"], 0);
    assert_eq!(detail["localRating"]["average"], 0.0);
}

#[actix_web::test]
async fn book_detail_falls_back_to_the_stored_year() {
    let app = test_app!(no_metadata());
    let req = test::TestRequest::get().uri("/book/0380795272").to_request();
    let detail: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["publishedYear"], 1998);
    assert_eq!(detail["averageRating"], "N/A");
}

#[actix_web::test]
async fn unknown_books_return_not_found() {
    let app = test_app!(no_metadata());
    for uri in ["/api/9999999999", "/book/9999999999", "/view_reviews/9999999999"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404, "uri {uri}");
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "not_found");
    }
}

#[actix_web::test]
async fn malformed_isbns_are_rejected() {
    let app = test_app!(no_metadata());
    let req = test::TestRequest::get().uri("/api/not-an-isbn!").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "invalid_request");
}
