use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::{debug, info, instrument};

use crate::{
    auth::{
        cookie,
        dto::{LoginRequest, MessageResponse, SafeUser, SessionResponse},
        extractors::{CurrentUser, RequireAuth},
        jwt::JwtKeys,
        services::{authenticate, validate_login},
    },
    error::AppError,
    state::AppState,
};

pub fn session_routes() -> Router<AppState> {
    Router::new().route(
        "/session",
        post(login).delete(logout).get(restore_session),
    )
}

/// POST /session
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let payload = match payload {
        Ok(Json(p)) => p,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable login body");
            LoginRequest::default()
        }
    };
    let creds = validate_login(payload)?;

    let user = authenticate(state.users.as_ref(), &creds.credential, &creds.password).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    let set_cookie = cookie::token_cookie(
        &token,
        state.config.jwt.expires_in_secs,
        state.config.environment.is_production(),
    )?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok((
        [(header::SET_COOKIE, set_cookie)],
        Json(SessionResponse {
            user: Some(SafeUser::from(&user)),
        }),
    )
        .into_response())
}

/// DELETE /session
#[instrument(skip_all)]
pub async fn logout(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    info!(user_id = %user.id, "user logged out");
    (
        [(header::SET_COOKIE, cookie::cleared_token_cookie())],
        Json(MessageResponse {
            message: "success".into(),
        }),
    )
}

/// GET /session
#[instrument(skip_all)]
pub async fn restore_session(CurrentUser(user): CurrentUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: user.as_ref().map(SafeUser::from),
    })
}
