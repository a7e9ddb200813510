use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use cobranca_services::{Messenger, WhatsAppError};

/// Recording stand-in for the WhatsApp gateway.
#[derive(Default)]
pub struct MockMessenger {
    pub sent: Mutex<Vec<SentMessage>>,
    connected: AtomicBool,
    reconnectable: AtomicBool,
    failure: Mutex<Option<MockFailure>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Text {
        instance: String,
        phone: String,
        text: String,
    },
    File {
        instance: String,
        phone: String,
        url: String,
        filename: String,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum MockFailure {
    RecipientUnavailable,
    Gateway,
}

impl MockMessenger {
    pub fn connected() -> Self {
        let mock = Self::default();
        mock.connected.store(true, Ordering::SeqCst);
        mock.reconnectable.store(true, Ordering::SeqCst);
        mock
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Whether a reconnect attempt brings the channel back up.
    pub fn set_reconnectable(&self, reconnectable: bool) {
        self.reconnectable.store(reconnectable, Ordering::SeqCst);
    }

    pub fn fail_sends_with(&self, failure: Option<MockFailure>) {
        *self.failure.lock().unwrap() = failure;
    }

    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent_messages()
            .into_iter()
            .filter_map(|m| match m {
                SentMessage::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn maybe_fail(&self) -> Result<(), WhatsAppError> {
        match *self.failure.lock().unwrap() {
            Some(MockFailure::RecipientUnavailable) => Err(WhatsAppError::RecipientUnavailable),
            Some(MockFailure::Gateway) => Err(WhatsAppError::Gateway {
                status: 500,
                message: "mock gateway failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send_text(
        &self,
        instance: &str,
        phone: &str,
        text: &str,
    ) -> Result<(), WhatsAppError> {
        self.maybe_fail()?;
        self.sent.lock().unwrap().push(SentMessage::Text {
            instance: instance.to_string(),
            phone: phone.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_file(
        &self,
        instance: &str,
        phone: &str,
        url: &str,
        filename: &str,
        _caption: &str,
    ) -> Result<(), WhatsAppError> {
        self.maybe_fail()?;
        self.sent.lock().unwrap().push(SentMessage::File {
            instance: instance.to_string(),
            phone: phone.to_string(),
            url: url.to_string(),
            filename: filename.to_string(),
        });
        Ok(())
    }

    async fn is_connected(&self, _instance: &str) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn reconnect(&self, _instance: &str) -> bool {
        let up = self.reconnectable.load(Ordering::SeqCst);
        self.connected.store(up, Ordering::SeqCst);
        up
    }
}
