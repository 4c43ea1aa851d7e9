use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use uuid::Uuid;

use crate::auth::cookie;
use crate::auth::{self, Claims};
use crate::error::ApiError;

/// Caller identity extracted from a verified session token. Inserted as a
/// request extension by `authenticate`; downstream handlers have no other
/// way to learn who is calling.
#[derive(Clone, Debug)]
pub struct Principal {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
        }
    }
}

/// Session authentication middleware. Reads the session cookie, verifies
/// the token and injects the `Principal`; requests without a valid session
/// stop here with 401.
pub async fn authenticate(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let claims = auth::codec().verify(token)?;

    let principal = Principal::from(claims);
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Extract the session token from the Cookie header, if any.
fn extract_session_token(headers: &HeaderMap) -> Option<&str> {
    let cookie_header = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    cookie::session_token(cookie_header)
}
