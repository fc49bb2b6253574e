use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewSpot, SpotImageRow, SpotRow};

/// A spot together with its images in insertion order.
pub type SpotWithImages = (SpotRow, Vec<SpotImageRow>);

#[async_trait]
pub trait SpotRepo: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<SpotWithImages>>;
    async fn find(&self, id: i64) -> anyhow::Result<Option<SpotWithImages>>;
    async fn create(&self, owner_id: Uuid, spot: &NewSpot) -> anyhow::Result<SpotRow>;
    async fn add_image(&self, spot_id: i64, url: &str, preview: bool)
        -> anyhow::Result<SpotImageRow>;
    /// `false` when nothing was deleted.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgSpotRepo {
    db: PgPool,
}

impl PgSpotRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn images_for(&self, spot_ids: &[i64]) -> anyhow::Result<Vec<SpotImageRow>> {
        let rows = sqlx::query_as::<_, SpotImageRow>(
            r#"
            SELECT id, spot_id, url, preview, created_at
              FROM spot_images
             WHERE spot_id = ANY($1)
             ORDER BY id ASC
            "#,
        )
        .bind(spot_ids)
        .fetch_all(&self.db)
        .await
        .context("list spot images")?;
        Ok(rows)
    }
}

#[async_trait]
impl SpotRepo for PgSpotRepo {
    async fn list(&self) -> anyhow::Result<Vec<SpotWithImages>> {
        let spots = sqlx::query_as::<_, SpotRow>(
            r#"
            SELECT id, owner_id, address, city, state, country, lat, lng,
                   name, description, price, created_at, updated_at
              FROM spots
             ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list spots")?;

        let ids: Vec<i64> = spots.iter().map(|s| s.id).collect();
        let mut by_spot: HashMap<i64, Vec<SpotImageRow>> = HashMap::new();
        for image in self.images_for(&ids).await? {
            by_spot.entry(image.spot_id).or_default().push(image);
        }

        Ok(spots
            .into_iter()
            .map(|s| {
                let images = by_spot.remove(&s.id).unwrap_or_default();
                (s, images)
            })
            .collect())
    }

    async fn find(&self, id: i64) -> anyhow::Result<Option<SpotWithImages>> {
        let spot = sqlx::query_as::<_, SpotRow>(
            r#"
            SELECT id, owner_id, address, city, state, country, lat, lng,
                   name, description, price, created_at, updated_at
              FROM spots
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get spot")?;

        match spot {
            Some(spot) => {
                let images = self.images_for(&[spot.id]).await?;
                Ok(Some((spot, images)))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, owner_id: Uuid, spot: &NewSpot) -> anyhow::Result<SpotRow> {
        let row = sqlx::query_as::<_, SpotRow>(
            r#"
            INSERT INTO spots (owner_id, address, city, state, country, lat, lng,
                               name, description, price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, owner_id, address, city, state, country, lat, lng,
                      name, description, price, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(&spot.address)
        .bind(&spot.city)
        .bind(&spot.state)
        .bind(&spot.country)
        .bind(spot.lat)
        .bind(spot.lng)
        .bind(&spot.name)
        .bind(&spot.description)
        .bind(spot.price)
        .fetch_one(&self.db)
        .await
        .context("insert spot")?;
        Ok(row)
    }

    async fn add_image(
        &self,
        spot_id: i64,
        url: &str,
        preview: bool,
    ) -> anyhow::Result<SpotImageRow> {
        let row = sqlx::query_as::<_, SpotImageRow>(
            r#"
            INSERT INTO spot_images (spot_id, url, preview)
            VALUES ($1, $2, $3)
            RETURNING id, spot_id, url, preview, created_at
            "#,
        )
        .bind(spot_id)
        .bind(url)
        .bind(preview)
        .fetch_one(&self.db)
        .await
        .context("insert spot image")?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM spots WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete spot")?;
        Ok(res.rows_affected() > 0)
    }
}
