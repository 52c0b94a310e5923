//! Clodo implementations of the capability traits.

pub mod compute;
pub mod dns;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Provider name reported by both drivers.
pub const PROVIDER_NAME: &str = "Clodo";

/// Deserialize an identifier the API may send as a string or a number.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Deserialize an optional TTL sent as a number, a numeric string, or null.
pub(crate) fn lenient_ttl<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("ttl out of range: {n}"))),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid ttl: {s}"))),
        Some(other) => Err(de::Error::custom(format!("invalid ttl: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Ids {
        #[serde(deserialize_with = "id_string")]
        id: String,
        #[serde(default, deserialize_with = "lenient_ttl")]
        ttl: Option<u32>,
    }

    #[test]
    fn test_id_from_string_or_number() {
        let a: Ids = serde_json::from_str(r#"{"id": "60"}"#).unwrap();
        let b: Ids = serde_json::from_str(r#"{"id": 60}"#).unwrap();
        assert_eq!(a.id, "60");
        assert_eq!(b.id, "60");
    }

    #[test]
    fn test_id_rejects_objects() {
        assert!(serde_json::from_str::<Ids>(r#"{"id": {}}"#).is_err());
    }

    #[test]
    fn test_ttl_variants() {
        let t = |json: &str| serde_json::from_str::<Ids>(json).unwrap().ttl;
        assert_eq!(t(r#"{"id": 1}"#), None);
        assert_eq!(t(r#"{"id": 1, "ttl": null}"#), None);
        assert_eq!(t(r#"{"id": 1, "ttl": ""}"#), None);
        assert_eq!(t(r#"{"id": 1, "ttl": 3600}"#), Some(3600));
        assert_eq!(t(r#"{"id": 1, "ttl": "86400"}"#), Some(86400));
        assert!(serde_json::from_str::<Ids>(r#"{"id": 1, "ttl": "soon"}"#).is_err());
    }
}
