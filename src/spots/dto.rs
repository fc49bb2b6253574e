use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{SpotImageRow, SpotRow};

/// Text fields of the wrong type read as missing. Coordinates and price are
/// kept as raw JSON so a malformed value can be reported as invalid.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpotRequest {
    #[serde(default, deserialize_with = "crate::fields::lenient")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "crate::fields::lenient")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "crate::fields::lenient")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "crate::fields::lenient")]
    pub country: Option<String>,
    #[serde(default)]
    pub lat: Option<Value>,
    #[serde(default)]
    pub lng: Option<Value>,
    #[serde(default, deserialize_with = "crate::fields::lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::fields::lenient")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateImageRequest {
    #[serde(default, deserialize_with = "crate::fields::lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "crate::fields::lenient")]
    pub preview: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SpotImage {
    pub url: String,
    pub preview: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotResponse {
    pub id: i64,
    pub owner_id: Uuid,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub preview_image: Option<String>,
    pub images: Vec<SpotImage>,
}

impl SpotResponse {
    pub fn new(spot: SpotRow, images: Vec<SpotImageRow>) -> Self {
        let preview_image = images.iter().find(|i| i.preview).map(|i| i.url.clone());
        Self {
            id: spot.id,
            owner_id: spot.owner_id,
            address: spot.address,
            city: spot.city,
            state: spot.state,
            country: spot.country,
            lat: spot.lat,
            lng: spot.lng,
            name: spot.name,
            description: spot.description,
            price: spot.price,
            created_at: spot.created_at,
            updated_at: spot.updated_at,
            preview_image,
            images: images
                .into_iter()
                .map(|i| SpotImage {
                    url: i.url,
                    preview: i.preview,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SpotsResponse {
    #[serde(rename = "Spots")]
    pub spots: Vec<SpotResponse>,
}

/// Body returned after attaching an image.
#[derive(Debug, Serialize)]
pub struct ImageRecordResponse {
    pub id: i64,
    pub url: String,
    pub preview: bool,
}

impl From<SpotImageRow> for ImageRecordResponse {
    fn from(r: SpotImageRow) -> Self {
        Self {
            id: r.id,
            url: r.url,
            preview: r.preview,
        }
    }
}
