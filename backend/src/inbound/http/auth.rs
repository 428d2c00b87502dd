//! Account handlers: register, login, logout.
//!
//! Login success binds the user id to the cookie session; logout drops the
//! whole session unconditionally. Credential failures never reveal whether
//! the username or the password was wrong.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, RegistrationRequest, User};
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Credentials form accepted by login and register.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsForm {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Stable account identifier.
    pub id: String,
    /// Account username.
    pub username: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
        }
    }
}

/// Whether the current session is authenticated.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    /// True when a user id is bound to the session.
    pub logged_in: bool,
    /// The bound user id, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Current session status.
#[utoipa::path(
    get,
    path = "/login",
    responses((status = 200, description = "Session status", body = SessionStatus)),
    tags = ["auth"],
    operation_id = "sessionStatus"
)]
#[get("/login")]
pub async fn login_status(session: SessionContext) -> ApiResult<web::Json<SessionStatus>> {
    let user_id = session.user_id()?;
    Ok(web::Json(SessionStatus {
        logged_in: user_id.is_some(),
        user_id: user_id.map(|id| id.to_string()),
    }))
}

/// Authenticate and bind the user to the session.
#[utoipa::path(
    post,
    path = "/login",
    responses(
        (status = 200, description = "Logged in", body = UserResponse),
        (status = 401, description = "Invalid username or password", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<CredentialsForm>,
) -> ApiResult<web::Json<UserResponse>> {
    let credentials = LoginCredentials::try_from_parts(&form.username, &form.password)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let user = state.identity.login(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Clear the session. Succeeds whether or not anyone was logged in.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 200, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(serde_json::json!({ "loggedOut": true }))
}

/// GET variant kept for parity with the original route table.
#[get("/logout")]
pub async fn logout_get(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(serde_json::json!({ "loggedOut": true }))
}

/// Describe the registration form contract.
#[get("/register")]
pub async fn register_form() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "fields": ["username", "password"] }))
}

/// Create a new account.
#[utoipa::path(
    post,
    path = "/register",
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid username or password shape", body = crate::inbound::http::error::ApiError),
        (status = 409, description = "Username already exists", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    form: web::Form<CredentialsForm>,
) -> ApiResult<HttpResponse> {
    let request = RegistrationRequest::try_from_parts(&form.username, &form.password)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let user = state.identity.register(&request).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}
