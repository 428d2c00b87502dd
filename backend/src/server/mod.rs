//! Server construction and middleware wiring.

mod config;

pub use config::{AppConfig, load_session_key};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};

use crate::inbound::http::routes;
use crate::inbound::http::state::HttpState;
use crate::middleware::trace::Trace;

/// Cookie-backed session middleware shared by the server and the HTTP tests.
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build()
}

/// Construct the HTTP server over a pre-wired dependency bundle.
///
/// The returned [`Server`] must be awaited to drive the listener.
pub fn create_server(state: HttpState, key: Key, config: &AppConfig) -> std::io::Result<Server> {
    let cookie_secure = config.cookie_secure;
    let state = web::Data::new(state);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(session_middleware(key.clone(), cookie_secure))
            .wrap(Trace)
            .configure(routes::configure)
    })
    .bind(config.bind_addr)?
    .run();
    Ok(server)
}
