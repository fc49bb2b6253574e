use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, info, instrument};

use super::{
    dto::{
        CreateImageRequest, CreateSpotRequest, ImageRecordResponse, SpotResponse, SpotsResponse,
    },
    services::{owned_spot, validate_new_image, validate_new_spot, SPOT_NOT_FOUND},
};
use crate::{
    auth::{dto::MessageResponse, extractors::RequireAuth},
    error::AppError,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/spots", get(list_spots))
        .route("/spots/:id", get(get_spot))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/spots", post(create_spot))
        .route("/spots/:id", axum::routing::delete(delete_spot))
        .route("/spots/:id/images", post(add_spot_image))
}

/// Ids that do not parse name no spot at all.
fn spot_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        debug!(error = %rejection, "unparseable spot id");
        AppError::NotFound(SPOT_NOT_FOUND.into())
    })
}

#[instrument(skip(state))]
pub async fn list_spots(State(state): State<AppState>) -> Result<Json<SpotsResponse>, AppError> {
    let spots = state
        .spots
        .list()
        .await?
        .into_iter()
        .map(|(spot, images)| SpotResponse::new(spot, images))
        .collect();
    Ok(Json(SpotsResponse { spots }))
}

#[instrument(skip(state, path))]
pub async fn get_spot(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<SpotResponse>, AppError> {
    let id = spot_id(path)?;
    let (spot, images) = state
        .spots
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(SPOT_NOT_FOUND.into()))?;
    Ok(Json(SpotResponse::new(spot, images)))
}

/// POST /spots
#[instrument(skip_all)]
pub async fn create_spot(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    payload: Result<Json<CreateSpotRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SpotResponse>), AppError> {
    let payload = match payload {
        Ok(Json(p)) => p,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable spot body");
            CreateSpotRequest::default()
        }
    };
    let new_spot = validate_new_spot(payload)?;
    let spot = state.spots.create(user.id, &new_spot).await?;
    info!(spot_id = spot.id, owner_id = %user.id, "spot created");
    Ok((StatusCode::CREATED, Json(SpotResponse::new(spot, Vec::new()))))
}

/// POST /spots/:id/images
#[instrument(skip_all)]
pub async fn add_spot_image(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CreateImageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ImageRecordResponse>), AppError> {
    let id = spot_id(path)?;
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let (url, preview) = validate_new_image(payload)?;
    owned_spot(state.spots.as_ref(), id, user.id).await?;
    let image = state.spots.add_image(id, &url, preview).await?;
    info!(spot_id = id, image_id = image.id, "spot image added");
    Ok((StatusCode::CREATED, Json(image.into())))
}

/// DELETE /spots/:id
#[instrument(skip_all)]
pub async fn delete_spot(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = spot_id(path)?;
    owned_spot(state.spots.as_ref(), id, user.id).await?;
    if !state.spots.delete(id).await? {
        return Err(AppError::NotFound(SPOT_NOT_FOUND.into()));
    }
    info!(spot_id = id, "spot deleted");
    Ok(Json(MessageResponse {
        message: "Successfully deleted".into(),
    }))
}
