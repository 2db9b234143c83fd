//! Wire timestamps.
//!
//! The API transports dates as unix timestamps in seconds. Entities keep them as
//! `DateTime<Utc>` and use the serde adapters below on the field.

use chrono::{DateTime, Utc};

use crate::error::{ObjectError, ObjectResult};

pub fn to_timestamp(value: &DateTime<Utc>) -> i64 {
    value.timestamp()
}

pub fn from_timestamp(seconds: i64) -> ObjectResult<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0).ok_or(ObjectError::Timestamp(seconds))
}

/// `#[serde(with = "tgkit_core::datetime::timestamp")]`
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::de::{self, Deserialize, Deserializer};
    use serde::Serializer;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(super::to_timestamp(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Seconds::deserialize(deserializer)?;
        super::from_timestamp(raw.whole()).map_err(de::Error::custom)
    }

    /// Integer seconds, tolerating a float representation.
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    pub(super) enum Seconds {
        Int(i64),
        Float(f64),
    }

    impl Seconds {
        pub(super) fn whole(&self) -> i64 {
            match *self {
                Seconds::Int(v) => v,
                Seconds::Float(v) => v.trunc() as i64,
            }
        }
    }
}

/// `#[serde(default, with = "tgkit_core::datetime::timestamp_option")]`
pub mod timestamp_option {
    use chrono::{DateTime, Utc};
    use serde::de::{self, Deserialize, Deserializer};
    use serde::Serializer;

    use super::timestamp::Seconds;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_some(&super::to_timestamp(v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Seconds>::deserialize(deserializer)? {
            Some(raw) => super::from_timestamp(raw.whole())
                .map(Some)
                .map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}
