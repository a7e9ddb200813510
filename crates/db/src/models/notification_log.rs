use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// One unit of notification work. Doubles as the audit record: payer name
/// and phone are snapshotted at enqueue time on purpose, so the log shows
/// who was actually contacted even if the invoice changes later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationLog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub tenant_id: ObjectId,
    pub invoice_id: ObjectId,
    pub student_name: String,
    pub tutor_name: Option<String>,
    pub target_phone: String,
    pub category: NotificationCategory,
    #[serde(default)]
    pub status: NotificationStatus,
    pub scheduled_for: DateTime,
    pub sent_at: Option<DateTime>,
    #[serde(default)]
    pub attempts: u32,
    pub error_message: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    NewInvoice,
    Reminder,
    DueToday,
    Overdue,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewInvoice => "new_invoice",
            Self::Reminder => "reminder",
            Self::DueToday => "due_today",
            Self::Overdue => "overdue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    #[default]
    Queued,
    Processing,
    Sent,
    Failed,
    Cancelled,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Legal state-machine moves. `Failed -> Queued` is the manual retry
    /// path; `Cancelled` is reachable from any non-terminal state by
    /// administrative action only.
    pub fn can_transition(self, to: NotificationStatus) -> bool {
        use NotificationStatus::*;
        matches!(
            (self, to),
            (Queued, Processing)
                | (Processing, Sent)
                | (Processing, Failed)
                | (Failed, Queued)
                | (Queued, Cancelled)
                | (Processing, Cancelled)
                | (Failed, Cancelled)
        )
    }
}

impl NotificationLog {
    pub const COLLECTION: &'static str = "notification_logs";
}
