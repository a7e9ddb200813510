use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Per-tenant debt-collection settings. Created lazily with defaults on
/// first read, upserted on save, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub tenant_id: ObjectId,
    /// Master switch; an inactive tenant is skipped by the scanner entirely.
    pub is_active: bool,
    /// "HH:MM" wall-clock bounds of the daily sending window.
    pub window_start: String,
    pub window_end: String,
    pub enable_reminder: bool,
    pub enable_due_today: bool,
    pub enable_overdue: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl NotificationConfig {
    pub const COLLECTION: &'static str = "notification_configs";

    pub fn with_defaults(tenant_id: ObjectId) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            tenant_id,
            is_active: true,
            window_start: "08:00".to_string(),
            window_end: "20:00".to_string(),
            enable_reminder: true,
            enable_due_today: true,
            enable_overdue: true,
            created_at: now,
            updated_at: now,
        }
    }
}
