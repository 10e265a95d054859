//! Daily life record model.

use serde::Serialize;
use utoipa::ToSchema;

use crate::datetime::{serialize_rfc3339, serialize_rfc3339_opt};

/// A daily life record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyLifeRecord {
    /// Record ID.
    pub id: i64,
    /// Record text.
    pub content: String,
    /// Soft-delete flag.
    pub del_flag: String,
    /// Creator.
    pub create_by: Option<String>,
    /// Creation time.
    #[serde(serialize_with = "serialize_rfc3339")]
    pub create_time: String,
    /// Last updater.
    pub update_by: Option<String>,
    /// Last update time.
    #[serde(serialize_with = "serialize_rfc3339_opt")]
    pub update_time: Option<String>,
    /// Free-form remark.
    pub remark: Option<String>,
}

/// Data for creating a record.
#[derive(Debug, Clone)]
pub struct NewRecord {
    /// Record text.
    pub content: String,
    /// Remark.
    pub remark: Option<String>,
    /// Creator.
    pub create_by: String,
}

impl NewRecord {
    /// Create a new record owned by `create_by`.
    pub fn new(content: impl Into<String>, create_by: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            remark: None,
            create_by: create_by.into(),
        }
    }
}

/// Partial update for a record.
#[derive(Debug, Clone)]
pub struct RecordUpdate {
    /// New text.
    pub content: Option<String>,
    /// New remark.
    pub remark: Option<Option<String>>,
    /// Who made the change.
    pub update_by: String,
}

impl RecordUpdate {
    /// Create an update made by `update_by` that changes nothing yet.
    pub fn new(update_by: impl Into<String>) -> Self {
        Self {
            content: None,
            remark: None,
            update_by: update_by.into(),
        }
    }

    /// Set the text.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}
