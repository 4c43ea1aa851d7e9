// GET /api/auth/whoami and DELETE /api/auth/account

use axum::http::header;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Extension;
use serde_json::json;

use crate::auth::cookie;
use crate::config::config;
use crate::database::manager::Database;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::auth::Principal;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::account::AccountService;

/// Returns the calling account, fresh from storage rather than echoed from
/// token claims. A token can outlive its account by up to an hour; treat
/// that window as unauthenticated.
pub async fn whoami_get(Extension(principal): Extension<Principal>) -> ApiResult<User> {
    let pool = Database::pool().await?.clone();
    let user = AccountService::new(pool)
        .get(principal.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("this session's account no longer exists"))?;

    Ok(ApiResponse::success(user))
}

/// Deletes the calling account and everything it owns, then clears the
/// session cookie.
pub async fn account_delete(
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = Database::pool().await?.clone();
    AccountService::new(pool).delete(principal.id).await?;

    tracing::info!(user_id = %principal.id, "account deleted");

    let set_cookie = cookie::clear_session_cookie(config().security.secure_cookies);
    Ok((
        AppendHeaders([(header::SET_COOKIE, set_cookie)]),
        ApiResponse::success(json!({ "deleted": true })),
    ))
}
