// POST /auth/login and POST /auth/logout - session cookie lifecycle

use axum::http::header;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{self, cookie};
use crate::config::config;
use crate::database::manager::Database;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;
use crate::services::account::AccountService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Verifies credentials and sets the session cookie. The token inside the
/// cookie is self-contained and good for one hour from this moment.
pub async fn login_post(
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = Database::pool().await?.clone();
    let user = AccountService::new(pool)
        .verify_credentials(&payload.email, &payload.password)
        .await?;

    let codec = auth::codec();
    let token = codec.issue(user.id, &user.name, &user.email)?;
    let set_cookie = cookie::session_cookie(
        &token,
        codec.ttl_seconds(),
        config().security.secure_cookies,
    );

    tracing::info!(user_id = %user.id, "session opened");

    Ok((
        AppendHeaders([(header::SET_COOKIE, set_cookie)]),
        ApiResponse::success(json!({
            "user": user,
            "expiresIn": codec.ttl_seconds()
        })),
    ))
}

/// Clears the session cookie. Tokens are stateless, so there is nothing to
/// revoke server-side; a copy of the old token kept elsewhere stays valid
/// until its hour runs out.
pub async fn logout_post() -> impl IntoResponse {
    let set_cookie = cookie::clear_session_cookie(config().security.secure_cookies);

    (
        AppendHeaders([(header::SET_COOKIE, set_cookie)]),
        ApiResponse::success(json!({ "loggedOut": true })),
    )
}
