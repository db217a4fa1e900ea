use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::requisition::Requisition;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequisitionStatus {
    #[default]
    Draft,
    Completed,
    Archived,
}

/// A requisition as persisted in the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRequisition {
    pub id: Uuid,
    pub user_id: String,
    #[serde(default)]
    pub form_data: Requisition,
    #[serde(default)]
    pub status: RequisitionStatus,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl StoredRequisition {
    /// A fresh draft owned by `user_id`, stamped with a single `now`.
    pub fn draft(user_id: impl Into<String>, form_data: Requisition) -> Self {
        let now = jiff::Timestamp::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            form_data,
            status: RequisitionStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update applied to a stored requisition.
///
/// `form_data` is a JSON patch merged leaf by leaf over the existing record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequisitionUpdate {
    #[serde(default)]
    pub form_data: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<RequisitionStatus>,
}
