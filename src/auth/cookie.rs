/// Name of the session cookie carrying the signed token.
pub const SESSION_COOKIE: &str = "access_token";

/// Build the Set-Cookie value that establishes a session. HttpOnly keeps
/// scripts away from the token; `secure` is on outside development.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the Set-Cookie value that ends a session. Logout is exactly this
/// header: there is no server-side session state to revoke, and a token
/// already handed out stays verifiable until its window closes.
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
        SESSION_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Pull the session token out of a raw Cookie header value.
pub fn session_token(cookie_header: &str) -> Option<&str> {
    cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .filter(|token| !token.is_empty())
}
