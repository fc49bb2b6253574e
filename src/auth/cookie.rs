use axum::http::{header, HeaderMap, HeaderValue};

use crate::error::AppError;

pub const TOKEN_COOKIE: &str = "token";

pub fn token_cookie(token: &str, max_age_secs: i64, secure: bool) -> Result<HeaderValue, AppError> {
    let mut cookie = format!("{TOKEN_COOKIE}={token}; Path=/; HttpOnly; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure; SameSite=Lax");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid cookie header: {e}")))
}

pub fn cleared_token_cookie() -> HeaderValue {
    HeaderValue::from_static(
        "token=; Path=/; HttpOnly; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
    )
}

/// Value of the session cookie, if the request carries a non-empty one.
pub fn read_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
