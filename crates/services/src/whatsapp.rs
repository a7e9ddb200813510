use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum WhatsAppError {
    #[error("WhatsApp channel is not connected")]
    NotConnected,
    #[error("recipient has no WhatsApp account")]
    RecipientUnavailable,
    #[error("gateway error ({status}): {message}")]
    Gateway { status: u16, message: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Outbound messaging capability, keyed by the tenant's gateway instance
/// name. The processor only talks to this trait, so the concrete gateway
/// (or a test double) is swappable.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, instance: &str, phone: &str, text: &str)
    -> Result<(), WhatsAppError>;

    async fn send_file(
        &self,
        instance: &str,
        phone: &str,
        url: &str,
        filename: &str,
        caption: &str,
    ) -> Result<(), WhatsAppError>;

    /// Cached connection status when available, live check otherwise.
    async fn is_connected(&self, instance: &str) -> bool;

    /// Live reconnect attempt; returns the post-attempt connection status.
    async fn reconnect(&self, instance: &str) -> bool;
}

/// Evolution-API-style WhatsApp HTTP gateway client. One gateway instance
/// per tenant, addressed by the tenant slug.
pub struct WhatsAppClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    connection_cache: DashMap<String, bool>,
}

#[derive(Debug, Deserialize)]
struct ConnectionStateResponse {
    instance: InstanceState,
}

#[derive(Debug, Deserialize)]
struct InstanceState {
    state: String,
}

impl WhatsAppClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            connection_cache: DashMap::new(),
        }
    }

    async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<(), WhatsAppError> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let message = resp
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| extract_gateway_message(&v))
            .unwrap_or_else(|| status.to_string());

        Err(classify_gateway_error(status.as_u16(), message))
    }

    async fn fetch_connection_state(&self, instance: &str) -> bool {
        let url = format!("{}/instance/connectionState/{}", self.base_url, instance);
        let result = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .send()
            .await;

        let connected = match result {
            Ok(resp) if resp.status().is_success() => resp
                .json::<ConnectionStateResponse>()
                .await
                .map(|r| r.instance.state == "open")
                .unwrap_or(false),
            Ok(resp) => {
                warn!(instance, status = %resp.status(), "Connection state check failed");
                false
            }
            Err(e) => {
                warn!(instance, %e, "Connection state check failed");
                false
            }
        };

        self.connection_cache.insert(instance.to_string(), connected);
        connected
    }
}

#[async_trait]
impl Messenger for WhatsAppClient {
    async fn send_text(
        &self,
        instance: &str,
        phone: &str,
        text: &str,
    ) -> Result<(), WhatsAppError> {
        debug!(instance, phone, "Sending WhatsApp text");
        self.post(
            &format!("/message/sendText/{}", instance),
            json!({ "number": phone, "text": text }),
        )
        .await
    }

    async fn send_file(
        &self,
        instance: &str,
        phone: &str,
        url: &str,
        filename: &str,
        caption: &str,
    ) -> Result<(), WhatsAppError> {
        debug!(instance, phone, filename, "Sending WhatsApp document");
        self.post(
            &format!("/message/sendMedia/{}", instance),
            json!({
                "number": phone,
                "mediatype": "document",
                "media": url,
                "fileName": filename,
                "caption": caption,
            }),
        )
        .await
    }

    async fn is_connected(&self, instance: &str) -> bool {
        if let Some(cached) = self.connection_cache.get(instance) {
            return *cached;
        }
        self.fetch_connection_state(instance).await
    }

    async fn reconnect(&self, instance: &str) -> bool {
        let url = format!("{}/instance/connect/{}", self.base_url, instance);
        if let Err(e) = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .send()
            .await
        {
            warn!(instance, %e, "Reconnect request failed");
            self.connection_cache.insert(instance.to_string(), false);
            return false;
        }
        self.fetch_connection_state(instance).await
    }
}

fn extract_gateway_message(body: &serde_json::Value) -> Option<String> {
    for key in ["message", "error", "response"] {
        match body.get(key) {
            Some(serde_json::Value::String(s)) => return Some(s.clone()),
            Some(serde_json::Value::Array(items)) => {
                let parts: Vec<&str> = items.iter().filter_map(|i| i.as_str()).collect();
                if !parts.is_empty() {
                    return Some(parts.join("; "));
                }
            }
            Some(nested @ serde_json::Value::Object(_)) => {
                if let Some(msg) = extract_gateway_message(nested) {
                    return Some(msg);
                }
            }
            _ => {}
        }
    }
    None
}

/// Maps the gateway's known failure shapes onto the closed error set.
fn classify_gateway_error(status: u16, message: String) -> WhatsAppError {
    let lower = message.to_lowercase();
    if lower.contains("not registered") || lower.contains("exists\":false")
        || (lower.contains("number") && lower.contains("whatsapp"))
    {
        return WhatsAppError::RecipientUnavailable;
    }
    if lower.contains("instance") && (lower.contains("closed") || lower.contains("disconnected"))
    {
        return WhatsAppError::NotConnected;
    }
    WhatsAppError::Gateway { status, message }
}
