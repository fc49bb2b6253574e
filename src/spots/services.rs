use std::ops::RangeInclusive;

use serde_json::Value;
use uuid::Uuid;

use super::{
    dto::{CreateImageRequest, CreateSpotRequest},
    repo::{SpotRepo, SpotWithImages},
    repo_types::NewSpot,
};
use crate::error::{AppError, FieldErrors};

pub const SPOT_NOT_FOUND: &str = "Spot couldn't be found";
const MAX_NAME_LEN: usize = 50;

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Absent stays absent; anything else must be a number inside `range`.
fn coordinate(value: Option<&Value>, range: RangeInclusive<f64>) -> Result<Option<f64>, ()> {
    match value {
        None => Ok(None),
        Some(v) => v.as_f64().filter(|n| range.contains(n)).map(Some).ok_or(()),
    }
}

pub fn validate_new_spot(req: CreateSpotRequest) -> Result<NewSpot, AppError> {
    let mut errors = FieldErrors::new();
    let mut require = |field: &str, value: Option<String>, message: &str| {
        let value = required(value);
        if value.is_none() {
            errors.insert(field.into(), message.into());
        }
        value
    };

    let address = require("address", req.address, "Street address is required");
    let city = require("city", req.city, "City is required");
    let state = require("state", req.state, "State is required");
    let country = require("country", req.country, "Country is required");
    let description = require("description", req.description, "Description is required");
    let name = required(req.name).filter(|n| n.chars().count() < MAX_NAME_LEN);
    if name.is_none() {
        errors.insert("name".into(), "Name must be less than 50 characters".into());
    }

    let lat = coordinate(req.lat.as_ref(), -90.0..=90.0).unwrap_or_else(|()| {
        errors.insert("lat".into(), "Latitude is not valid".into());
        None
    });
    let lng = coordinate(req.lng.as_ref(), -180.0..=180.0).unwrap_or_else(|()| {
        errors.insert("lng".into(), "Longitude is not valid".into());
        None
    });
    let price = req
        .price
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|p| p.is_finite() && *p > 0.0);
    if price.is_none() {
        errors.insert("price".into(), "Price per day is required".into());
    }

    match (address, city, state, country, name, description, price) {
        (Some(address), Some(city), Some(state), Some(country), Some(name), Some(description), Some(price))
            if errors.is_empty() =>
        {
            Ok(NewSpot {
                address,
                city,
                state,
                country,
                lat,
                lng,
                name,
                description,
                price,
            })
        }
        _ => Err(AppError::Validation(errors)),
    }
}

pub fn validate_new_image(req: CreateImageRequest) -> Result<(String, bool), AppError> {
    match required(req.url) {
        Some(url) => Ok((url, req.preview.unwrap_or(false))),
        None => Err(AppError::validation("url", "Image url is required")),
    }
}

/// Loads a spot the caller owns; 404 before 403.
pub async fn owned_spot(
    spots: &dyn SpotRepo,
    spot_id: i64,
    user_id: Uuid,
) -> Result<SpotWithImages, AppError> {
    let found = spots
        .find(spot_id)
        .await?
        .ok_or_else(|| AppError::NotFound(SPOT_NOT_FOUND.into()))?;
    if found.0.owner_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(found)
}
