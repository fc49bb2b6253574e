use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SpotRow {
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
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SpotImageRow {
    pub id: i64,
    pub spot_id: i64,
    pub url: String,
    pub preview: bool,
    pub created_at: OffsetDateTime,
}

/// Validated input for a new listing.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSpot {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub name: String,
    pub description: String,
    pub price: f64,
}
