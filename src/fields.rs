//! Request-body field helpers.
//!
//! Bodies are validated field by field, so a value of the wrong JSON type must
//! not fail deserialization of the whole body.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// `Some(T)` when the value has the expected shape; `None` when it is absent,
/// null, or of some other type. Use with `#[serde(default, deserialize_with)]`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
