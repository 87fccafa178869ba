//! Field decoders for schema-less documents. A stored value of the wrong
//! type reads as absent instead of failing the whole document.

use bson::Bson;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};

pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Bson::deserialize(deserializer)?;
    Ok(match raw {
        Bson::Null | Bson::Undefined => None,
        value => bson::from_bson(value).ok(),
    })
}

pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(optional(deserializer)?.unwrap_or_default())
}

/// A list whose unreadable items are dropped. A non-list reads as absent.
pub fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Bson::deserialize(deserializer)?;
    Ok(match raw {
        Bson::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| bson::from_bson(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// Day numbers stored as `3`, `3.0` or `"3"`. Anything else is 0, which the
/// view later replaces with the entry's position.
pub fn day_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Bson::deserialize(deserializer)?;
    let day = match raw {
        Bson::Int32(n) => n as f64,
        Bson::Int64(n) => n as f64,
        Bson::Double(f) => f,
        Bson::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if day.is_finite() && day >= 1.0 && day <= u32::MAX as f64 {
        Ok(day as u32)
    } else {
        Ok(0)
    }
}
