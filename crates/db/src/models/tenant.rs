use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub slug: String,
    /// Offset from UTC in minutes, used for wall-clock window and
    /// calendar-day decisions. -180 is America/Sao_Paulo without DST.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub deleted_at: Option<DateTime>,
}

fn default_utc_offset() -> i32 {
    -180
}

impl Tenant {
    pub const COLLECTION: &'static str = "tenants";
}
