use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};

use super::{cookie, jwt::JwtKeys, repo_types::User};
use crate::{error::AppError, state::AppState};

/// Identity resolved from the session cookie by [`restore_user`].
/// `None` means the request is anonymous.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<User>);

/// Rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub User);

/// Resolves the session cookie into a [`CurrentUser`] request extension.
/// Stale or forged tokens leave the request anonymous and clear the cookie.
pub async fn restore_user(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let mut clear_cookie = false;

    let token = cookie::read_token(req.headers()).map(str::to_owned);
    let user = match token.as_deref() {
        None => None,
        Some(token) => match JwtKeys::from_ref(&state).verify(token) {
            Ok(claims) => match state.users.find_by_id(claims.sub).await {
                Ok(Some(user)) => Some(user),
                Ok(None) => {
                    warn!(user_id = %claims.sub, "session token for unknown user");
                    clear_cookie = true;
                    None
                }
                Err(e) => {
                    error!(error = %format!("{e:#}"), "restore_user lookup failed");
                    None
                }
            },
            Err(e) => {
                debug!(error = %e, "rejected session token");
                clear_cookie = true;
                None
            }
        },
    };

    req.extensions_mut().insert(CurrentUser(user));
    let mut res = next.run(req).await;

    if clear_cookie && !res.headers().contains_key(header::SET_COOKIE) {
        res.headers_mut()
            .append(header::SET_COOKIE, cookie::cleared_token_cookie());
    }
    res
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<CurrentUser>() {
            Some(CurrentUser(Some(user))) => Ok(RequireAuth(user.clone())),
            _ => Err(AppError::AuthenticationRequired),
        }
    }
}
