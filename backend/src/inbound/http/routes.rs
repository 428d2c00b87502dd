//! Route table.
//!
//! ```text
//! GET  /                                    landing payload
//! GET  /search                              remembered query
//! POST /search                              search + enrichment
//! POST /submit_review_from_search/{isbn}    review submission
//! GET  /login                               session status
//! POST /login                               authenticate
//! GET|POST /logout                          clear session
//! GET  /register                            form contract
//! POST /register                            create account
//! GET  /view_reviews/{isbn}                 review listing
//! GET  /book/{isbn}                         detail view
//! POST /book/{isbn}                         review submission
//! GET  /api/{isbn}                          machine-readable record
//! ```

use actix_web::{HttpResponse, get, web};

use super::auth::{login, login_status, logout, logout_get, register, register_form};
use super::books::{book_detail, book_record, book_submit_review, view_reviews};
use super::reviews::submit_review_from_search;
use super::search::{run_search, search_form};

/// Landing payload.
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "bookrack",
        "message": "search the catalog, review books, view aggregated ratings",
    }))
}

/// Register every handler on the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(search_form)
        .service(run_search)
        .service(submit_review_from_search)
        .service(login_status)
        .service(login)
        .service(logout)
        .service(logout_get)
        .service(register_form)
        .service(register)
        .service(view_reviews)
        .service(book_detail)
        .service(book_submit_review)
        .service(book_record);
}
