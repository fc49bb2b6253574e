//! Normalized cache of spot listings keyed by id.
//!
//! Entities are held behind [`Arc`] so a reduction only allocates for the
//! entries it touches; everything else stays pointer-equal to the previous
//! state.

use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::Action;

pub type SpotId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotImage {
    pub url: String,
    pub preview: bool,
}

/// A listing as delivered by the API. Attributes other than `id` and
/// `images` are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: SpotId,
    #[serde(default, deserialize_with = "images_or_empty")]
    pub images: Vec<SpotImage>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// `"images": null` reads the same as an absent list.
fn images_or_empty<'de, D>(deserializer: D) -> Result<Vec<SpotImage>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<SpotImage>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Spot {
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpotAction {
    LoadAll(Vec<Spot>),
    LoadOne(Spot),
    Create(Spot),
    AttachImage {
        spot_id: SpotId,
        url: String,
        preview: bool,
    },
    Remove(SpotId),
}

impl SpotAction {
    pub fn kind(&self) -> &'static str {
        match self {
            SpotAction::LoadAll(_) => "spots/load_all",
            SpotAction::LoadOne(_) => "spots/load_one",
            SpotAction::Create(_) => "spots/create",
            SpotAction::AttachImage { .. } => "spots/attach_image",
            SpotAction::Remove(_) => "spots/remove",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpotsState {
    by_id: HashMap<SpotId, Arc<Spot>>,
}

impl SpotsState {
    pub fn get(&self, id: SpotId) -> Option<&Arc<Spot>> {
        self.by_id.get(&id)
    }

    pub fn contains(&self, id: SpotId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> Vec<SpotId> {
        let mut ids: Vec<_> = self.by_id.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Spot>> {
        self.by_id.values()
    }

    fn upsert(&mut self, spot: &Spot) {
        self.by_id.insert(spot.id, Arc::new(spot.clone()));
    }
}

pub fn reduce(mut state: SpotsState, action: &Action) -> SpotsState {
    let Action::Spots(action) = action else {
        return state;
    };

    match action {
        SpotAction::LoadAll(spots) => {
            for spot in spots {
                state.upsert(spot);
            }
        }
        SpotAction::LoadOne(spot) | SpotAction::Create(spot) => state.upsert(spot),
        SpotAction::AttachImage {
            spot_id,
            url,
            preview,
        } => {
            if let Some(entry) = state.by_id.get_mut(spot_id) {
                Arc::make_mut(entry).images.push(SpotImage {
                    url: url.clone(),
                    preview: *preview,
                });
            }
        }
        SpotAction::Remove(id) => {
            state.by_id.remove(id);
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::session::SessionAction;

    fn spot(id: SpotId, name: &str) -> Spot {
        serde_json::from_value(json!({ "id": id, "name": name, "city": "Oakland" })).unwrap()
    }

    fn apply(state: SpotsState, action: SpotAction) -> SpotsState {
        reduce(state, &Action::Spots(action))
    }

    #[test]
    fn load_all_upserts_and_keeps_unrelated_keys() {
        let state = apply(SpotsState::default(), SpotAction::LoadOne(spot(9, "nine")));
        let state = apply(
            state,
            SpotAction::LoadAll(vec![spot(1, "one"), spot(2, "two")]),
        );
        assert_eq!(state.ids(), vec![1, 2, 9]);
        assert_eq!(state.get(2).unwrap().attr("name"), Some(&json!("two")));
    }

    #[test]
    fn null_images_decode_as_empty() {
        let spot: Spot =
            serde_json::from_value(json!({ "id": 4, "name": "Loft", "images": null })).unwrap();
        assert!(spot.images.is_empty());
        assert_eq!(spot.attr("name"), Some(&json!("Loft")));
        assert!(spot.attr("images").is_none());

        let state = apply(SpotsState::default(), SpotAction::LoadOne(spot));
        let state = apply(
            state,
            SpotAction::AttachImage {
                spot_id: 4,
                url: "a.png".into(),
                preview: true,
            },
        );
        assert_eq!(state.get(4).unwrap().images.len(), 1);
    }

    #[test]
    fn load_one_is_idempotent() {
        let once = apply(SpotsState::default(), SpotAction::LoadOne(spot(1, "one")));
        let twice = apply(once.clone(), SpotAction::LoadOne(spot(1, "one")));
        assert_eq!(once, twice);
    }

    #[test]
    fn create_overwrites_existing_entry() {
        let state = apply(SpotsState::default(), SpotAction::LoadOne(spot(1, "old")));
        let state = apply(state, SpotAction::Create(spot(1, "new")));
        assert_eq!(state.len(), 1);
        assert_eq!(state.get(1).unwrap().attr("name"), Some(&json!("new")));
    }

    #[test]
    fn attach_image_appends_in_order() {
        let state = apply(SpotsState::default(), SpotAction::LoadOne(spot(1, "one")));
        let state = apply(
            state,
            SpotAction::AttachImage {
                spot_id: 1,
                url: "a.png".into(),
                preview: false,
            },
        );
        let state = apply(
            state,
            SpotAction::AttachImage {
                spot_id: 1,
                url: "b.png".into(),
                preview: true,
            },
        );
        assert_eq!(
            state.get(1).unwrap().images,
            vec![
                SpotImage {
                    url: "a.png".into(),
                    preview: false
                },
                SpotImage {
                    url: "b.png".into(),
                    preview: true
                },
            ]
        );
    }

    #[test]
    fn attach_image_does_not_mutate_previous_snapshot() {
        let before = apply(SpotsState::default(), SpotAction::LoadOne(spot(1, "one")));
        let after = apply(
            before.clone(),
            SpotAction::AttachImage {
                spot_id: 1,
                url: "a.png".into(),
                preview: true,
            },
        );
        assert!(before.get(1).unwrap().images.is_empty());
        assert_eq!(after.get(1).unwrap().images.len(), 1);
    }

    #[test]
    fn attach_image_on_unknown_id_is_noop() {
        let before = apply(
            SpotsState::default(),
            SpotAction::LoadAll(vec![spot(1, "one"), spot(2, "two")]),
        );
        let after = apply(
            before.clone(),
            SpotAction::AttachImage {
                spot_id: 42,
                url: "x.png".into(),
                preview: true,
            },
        );
        assert_eq!(before, after);
        for id in [1, 2] {
            assert!(Arc::ptr_eq(before.get(id).unwrap(), after.get(id).unwrap()));
        }
    }

    #[test]
    fn untouched_entries_keep_identity() {
        let before = apply(
            SpotsState::default(),
            SpotAction::LoadAll(vec![spot(1, "one"), spot(2, "two")]),
        );
        let after = apply(before.clone(), SpotAction::LoadOne(spot(2, "deux")));
        assert!(Arc::ptr_eq(before.get(1).unwrap(), after.get(1).unwrap()));
        assert!(!Arc::ptr_eq(before.get(2).unwrap(), after.get(2).unwrap()));
    }

    #[test]
    fn remove_deletes_only_that_key() {
        let state = apply(
            SpotsState::default(),
            SpotAction::LoadAll(vec![spot(1, "one"), spot(2, "two")]),
        );
        let state = apply(state, SpotAction::Remove(1));
        assert_eq!(state.ids(), vec![2]);

        let same = apply(state.clone(), SpotAction::Remove(1));
        assert_eq!(same, state);
    }

    #[test]
    fn foreign_actions_leave_state_unchanged() {
        let before = apply(SpotsState::default(), SpotAction::LoadOne(spot(1, "one")));
        let after = reduce(before.clone(), &Action::Session(SessionAction::RemoveUser));
        assert_eq!(before, after);
    }

    #[test]
    fn spot_keeps_unknown_attributes_and_defaults_images() {
        let s: Spot = serde_json::from_value(json!({
            "id": 3,
            "ownerId": "x",
            "avgRating": 4.5,
            "previewImage": null
        }))
        .unwrap();
        assert!(s.images.is_empty());
        assert_eq!(s.attr("avgRating"), Some(&json!(4.5)));
        let back = serde_json::to_value(&s).unwrap();
        assert_eq!(back["ownerId"], "x");
        assert_eq!(back["images"], json!([]));
    }
}
