use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use super::{ApiClient, ClientError};
use crate::store::{
    spots::{Spot, SpotAction, SpotId},
    Store,
};

/// Listing fields submitted when creating a spot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotForm {
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

#[derive(Debug, Deserialize)]
struct SpotsEnvelope {
    #[serde(rename = "Spots")]
    spots: Vec<Spot>,
}

#[derive(Debug, Serialize)]
struct ImageForm<'a> {
    url: &'a str,
    preview: bool,
}

/// Image record returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpotImageRecord {
    pub id: i64,
    pub url: String,
    pub preview: bool,
}

impl ApiClient {
    /// GET /api/spots, then `LoadAll`.
    #[instrument(skip_all)]
    pub async fn get_all_spots(&self, store: &Store) -> Result<Vec<Spot>, ClientError> {
        let envelope: SpotsEnvelope = self
            .send_json(self.request(Method::GET, "/api/spots"))
            .await
            .inspect_err(|e| error!(error = %e, "get_all_spots failed"))?;
        store.dispatch(SpotAction::LoadAll(envelope.spots.clone()));
        Ok(envelope.spots)
    }

    /// GET /api/spots/:id, then `LoadOne`.
    #[instrument(skip(self, store))]
    pub async fn get_spot(&self, store: &Store, spot_id: SpotId) -> Result<Spot, ClientError> {
        let spot: Spot = self
            .send_json(self.request(Method::GET, &format!("/api/spots/{spot_id}")))
            .await
            .inspect_err(|e| error!(error = %e, spot_id, "get_spot failed"))?;
        store.dispatch(SpotAction::LoadOne(spot.clone()));
        Ok(spot)
    }

    /// POST /api/spots, then `Create`.
    #[instrument(skip_all)]
    pub async fn create_spot(&self, store: &Store, form: &SpotForm) -> Result<Spot, ClientError> {
        let spot: Spot = self
            .send_json(self.request(Method::POST, "/api/spots").json(form))
            .await
            .inspect_err(|e| error!(error = %e, "create_spot failed"))?;
        store.dispatch(SpotAction::Create(spot.clone()));
        Ok(spot)
    }

    /// POST /api/spots/:id/images, then `AttachImage` keyed by the requested
    /// spot id (the response record does not carry it).
    #[instrument(skip(self, store, url))]
    pub async fn create_spot_image(
        &self,
        store: &Store,
        spot_id: SpotId,
        url: &str,
        preview: bool,
    ) -> Result<SpotImageRecord, ClientError> {
        let record: SpotImageRecord = self
            .send_json(
                self.request(Method::POST, &format!("/api/spots/{spot_id}/images"))
                    .json(&ImageForm { url, preview }),
            )
            .await
            .inspect_err(|e| error!(error = %e, spot_id, "create_spot_image failed"))?;
        store.dispatch(SpotAction::AttachImage {
            spot_id,
            url: record.url.clone(),
            preview: record.preview,
        });
        Ok(record)
    }

    /// DELETE /api/spots/:id, then `Remove`.
    #[instrument(skip(self, store))]
    pub async fn delete_spot(&self, store: &Store, spot_id: SpotId) -> Result<(), ClientError> {
        self.send_raw(self.request(Method::DELETE, &format!("/api/spots/{spot_id}")))
            .await
            .inspect_err(|e| error!(error = %e, spot_id, "delete_spot failed"))?;
        store.dispatch(SpotAction::Remove(spot_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::client::CSRF_HEADER;

    fn seeded_store() -> Store {
        let store = Store::new();
        store.dispatch(SpotAction::LoadAll(vec![
            serde_json::from_value(json!({ "id": 1, "name": "one" })).unwrap(),
            serde_json::from_value(json!({ "id": 2, "name": "two" })).unwrap(),
        ]));
        store
    }

    #[tokio::test]
    async fn get_all_spots_loads_envelope() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/spots");
                then.status(200).json_body(json!({
                    "Spots": [
                        { "id": 2, "name": "two (updated)", "images": [] },
                        { "id": 3, "name": "three" }
                    ]
                }));
            })
            .await;

        let api = ApiClient::new(server.base_url()).unwrap();
        let store = seeded_store();
        let spots = api.get_all_spots(&store).await.unwrap();
        m.assert_async().await;

        assert_eq!(spots.len(), 2);
        let state = store.snapshot().spots;
        assert_eq!(state.ids(), vec![1, 2, 3]);
        assert_eq!(state.get(2).unwrap().attr("name"), Some(&json!("two (updated)")));
    }

    #[tokio::test]
    async fn error_status_surfaces_body_and_leaves_store_alone() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/spots/7");
                then.status(404)
                    .json_body(json!({ "message": "Spot couldn't be found" }));
            })
            .await;

        let api = ApiClient::new(server.base_url()).unwrap();
        let store = seeded_store();
        let before = store.snapshot();

        let err = api.get_spot(&store, 7).await.unwrap_err();
        match err {
            ClientError::Api { status, body } => {
                assert_eq!(status.as_u16(), 404);
                assert_eq!(body["message"], "Spot couldn't be found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn non_json_error_body_is_kept_as_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/spots/1");
                then.status(502).body("bad gateway");
            })
            .await;

        let api = ApiClient::new(server.base_url()).unwrap();
        let store = seeded_store();
        let err = api.delete_spot(&store, 1).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api { ref body, .. } if body == &json!("bad gateway")
        ));
        assert!(store.select(|s| s.spots.contains(1)));
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/spots");
                then.status(200).body("<html>");
            })
            .await;

        let api = ApiClient::new(server.base_url()).unwrap();
        let store = Store::new();
        let err = api.get_all_spots(&store).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        assert!(store.select(|s| s.spots.is_empty()));
    }

    #[tokio::test]
    async fn create_spot_image_attaches_by_requested_id_and_sends_csrf() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/spots/1/images")
                    .header(CSRF_HEADER.to_ascii_lowercase(), "csrf-abc")
                    .json_body(json!({ "url": "a.png", "preview": true }));
                then.status(201)
                    .json_body(json!({ "id": 10, "url": "a.png", "preview": true }));
            })
            .await;

        let api = ApiClient::new(server.base_url())
            .unwrap()
            .with_csrf_token("csrf-abc");
        let store = seeded_store();
        let record = api.create_spot_image(&store, 1, "a.png", true).await.unwrap();
        m.assert_async().await;

        assert_eq!(record.id, 10);
        let images = store.select(|s| s.spots.get(1).unwrap().images.clone());
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].url, "a.png");
        assert!(images[0].preview);
        assert!(store.select(|s| s.spots.get(2).unwrap().images.is_empty()));
    }

    #[tokio::test]
    async fn create_and_delete_dispatch_one_action_each() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/spots");
                then.status(201)
                    .json_body(json!({ "id": 5, "name": "new", "images": [] }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/spots/1");
                then.status(200)
                    .json_body(json!({ "message": "Successfully deleted" }));
            })
            .await;

        let api = ApiClient::new(server.base_url()).unwrap();
        let store = seeded_store();
        let form = SpotForm {
            address: "1 Main St".into(),
            city: "Oakland".into(),
            state: "CA".into(),
            country: "USA".into(),
            lat: None,
            lng: None,
            name: "new".into(),
            description: "desc".into(),
            price: 10.0,
        };

        let spot = api.create_spot(&store, &form).await.unwrap();
        assert_eq!(spot.id, 5);
        api.delete_spot(&store, 1).await.unwrap();
        assert_eq!(store.select(|s| s.spots.ids()), vec![2, 5]);
    }
}
