// POST /auth/register - create an account

use axum::Json;
use serde::Deserialize;

use crate::database::manager::Database;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::account::AccountService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Creates an account. Registering does not start a session; call
/// /auth/login afterwards to get the cookie.
pub async fn register_post(Json(payload): Json<RegisterRequest>) -> ApiResult<User> {
    let name = payload.name.trim();
    let email = payload.email.trim();

    if name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::bad_request("a valid email is required"));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::bad_request("password must be at least 8 characters"));
    }

    // Casing is the service's concern; it stores emails lowercased.
    let pool = Database::pool().await?.clone();
    let user = AccountService::new(pool)
        .register(name, email, &payload.password)
        .await?;

    Ok(ApiResponse::created(user))
}
