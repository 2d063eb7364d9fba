use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::timestamp::deserialize_timestamp;

/// Id of the record inserted at startup.
pub const SEED_ID: i64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Automobile {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "color must not be empty"))]
    pub color: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub update_date: Option<DateTime<Utc>>,
    /// Opaque legacy flag. Stored and returned untouched.
    #[serde(default)]
    pub original: bool,
    #[serde(default)]
    pub deleted: bool,
}

impl Automobile {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: color.into(),
            creation_date: None,
            update_date: None,
            original: false,
            deleted: false,
        }
    }

    pub fn seed(now: DateTime<Utc>) -> Self {
        Self {
            id: Some(SEED_ID),
            name: "Ford".to_string(),
            color: "Green".to_string(),
            creation_date: Some(now),
            update_date: Some(now),
            original: true,
            deleted: false,
        }
    }

    /// Copies the caller-editable fields of `patch` onto this record.
    pub fn apply_refresh(&mut self, patch: &Automobile) {
        self.name = patch.name.clone();
        self.color = patch.color.clone();
        self.update_date = patch.update_date;
    }
}
