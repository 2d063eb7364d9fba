use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

// Accepts RFC 3339 strings and Unix timestamps in milliseconds, either as a number or a numeric string
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DateTimeOrTimestamp {
        String(String),
        Number(i64),
    }

    match Option::<DateTimeOrTimestamp>::deserialize(deserializer)? {
        None => Ok(None),
        Some(DateTimeOrTimestamp::String(s)) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("Invalid date format: {}", s))),
        Some(DateTimeOrTimestamp::Number(ms)) => from_millis(ms)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("Invalid timestamp: {}", ms))),
    }
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    value.parse::<i64>().ok().and_then(from_millis)
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}
