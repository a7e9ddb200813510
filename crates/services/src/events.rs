use cobranca_db::models::NotificationLog;
use serde::Serialize;
use tokio::sync::broadcast;

/// Fire-and-forget status-change fan-out. The scanner and processor publish
/// here; whatever real-time transport the deployment has (WebSocket layer,
/// SSE bridge) subscribes. Delivery is best-effort: no subscribers is fine.
#[derive(Clone)]
pub struct NotificationEvents {
    tx: broadcast::Sender<NotificationEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    #[serde(rename = "event")]
    pub kind: NotificationEventKind,
    pub entry: NotificationLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationEventKind {
    #[serde(rename = "notification:created")]
    Created,
    #[serde(rename = "notification:updated")]
    Updated,
}

impl NotificationEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.tx.subscribe()
    }

    pub fn emit_created(&self, entry: NotificationLog) {
        let _ = self.tx.send(NotificationEvent {
            kind: NotificationEventKind::Created,
            entry,
        });
    }

    pub fn emit_updated(&self, entry: NotificationLog) {
        let _ = self.tx.send(NotificationEvent {
            kind: NotificationEventKind::Updated,
            entry,
        });
    }
}

impl Default for NotificationEvents {
    fn default() -> Self {
        Self::new()
    }
}
