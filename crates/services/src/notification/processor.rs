use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use cobranca_config::settings::{NotificationSettings, WhatsAppSettings};
use cobranca_db::models::{
    Invoice, InvoiceStatus, NotificationLog, NotificationStatus, PaymentChannel, Tenant,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::dao::base::DaoError;
use crate::dao::{InvoiceDao, NotificationLogDao, TenantDao};
use crate::events::NotificationEvents;
use crate::whatsapp::{Messenger, WhatsAppError};

use super::clock;
use super::templates::{MessageContext, TemplateProvider};

#[derive(Debug, Error)]
enum DeliveryError {
    #[error("WhatsApp channel is not connected")]
    ChannelDisconnected,
    #[error("invoice no longer exists")]
    InvoiceNotFound,
    #[error("invoice already paid or cancelled")]
    InvoiceResolved,
    #[error(transparent)]
    Messaging(#[from] WhatsAppError),
    #[error(transparent)]
    Storage(#[from] DaoError),
}

impl DeliveryError {
    /// The operator-facing text persisted on the log entry. Known provider
    /// shapes get a friendly Portuguese message, the rest pass through.
    fn log_message(&self) -> String {
        match self {
            Self::ChannelDisconnected => "Canal do WhatsApp não conectado".to_string(),
            Self::InvoiceNotFound => "Cobrança não encontrada".to_string(),
            Self::InvoiceResolved => "Cobrança já quitada ou cancelada".to_string(),
            Self::Messaging(WhatsAppError::RecipientUnavailable) => {
                "O número não possui conta no WhatsApp".to_string()
            }
            Self::Messaging(e) => e.to_string(),
            Self::Storage(e) => e.to_string(),
        }
    }
}

/// Per-minute job that drains queued entries one small batch at a time,
/// throttling outbound messages to stay under the gateway's abuse radar.
pub struct NotificationProcessor {
    tenants: Arc<TenantDao>,
    invoices: Arc<InvoiceDao>,
    logs: Arc<NotificationLogDao>,
    messenger: Arc<dyn Messenger>,
    templates: Arc<dyn TemplateProvider>,
    events: NotificationEvents,
    settings: NotificationSettings,
    whatsapp: WhatsAppSettings,
    in_flight: AtomicBool,
}

impl NotificationProcessor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenants: Arc<TenantDao>,
        invoices: Arc<InvoiceDao>,
        logs: Arc<NotificationLogDao>,
        messenger: Arc<dyn Messenger>,
        templates: Arc<dyn TemplateProvider>,
        events: NotificationEvents,
        settings: NotificationSettings,
        whatsapp: WhatsAppSettings,
    ) -> Self {
        Self {
            tenants,
            invoices,
            logs,
            messenger,
            templates,
            events,
            settings,
            whatsapp,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Reentrancy guard: overlapping timer fires are no-ops, not
    /// concurrent drains. Scoped to the instance so sharded processors
    /// would not share state.
    pub async fn drain(&self) {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        self.drain_inner().await;
        self.in_flight.store(false, Ordering::Release);
    }

    async fn drain_inner(&self) {
        let batch = match self
            .logs
            .fetch_due_batch(bson::DateTime::now(), self.settings.drain_batch_size as i64)
            .await
        {
            Ok(batch) => batch,
            Err(e) => {
                warn!(%e, "Drain aborted: could not fetch queued entries");
                return;
            }
        };

        for entry in batch {
            if let Err(e) = self.process_entry(entry).await {
                warn!(%e, "Queue entry processing failed");
            }
        }
    }

    async fn process_entry(&self, mut entry: NotificationLog) -> Result<(), DaoError> {
        let id = entry.id.ok_or(DaoError::NotFound)?;

        self.logs
            .transition(id, NotificationStatus::Queued, NotificationStatus::Processing)
            .await?;
        entry.status = NotificationStatus::Processing;
        self.events.emit_updated(entry.clone());

        // Randomized spacing between messages. Deliberately trades
        // throughput for account safety with the gateway.
        let delay = throttle_secs(
            self.settings.throttle_min_secs,
            self.settings.throttle_max_secs,
        );
        if delay > 0 {
            tokio::time::sleep(Duration::from_secs(delay)).await;
        }

        match self.deliver(&entry).await {
            Ok(()) => {
                self.logs.mark_sent(id).await?;
                info!(entry_id = %id, phone = %entry.target_phone, "Notification sent");
            }
            Err(e) => {
                self.logs.mark_failed(id, &e.log_message()).await?;
                warn!(entry_id = %id, error = %e, "Notification failed");
            }
        }

        let final_entry = self.logs.base.find_by_id(id).await?;
        self.events.emit_updated(final_entry);
        Ok(())
    }

    async fn deliver(&self, entry: &NotificationLog) -> Result<(), DeliveryError> {
        let tenant = self.tenants.find_by_id(entry.tenant_id).await?;
        let instance = tenant.slug.as_str();

        // Trust the cached status, but give the channel one live
        // reconciliation attempt before declaring it down.
        if !self.messenger.is_connected(instance).await
            && !self.messenger.reconnect(instance).await
        {
            return Err(DeliveryError::ChannelDisconnected);
        }

        let invoice = match self
            .invoices
            .find_by_id_in_tenant(entry.tenant_id, entry.invoice_id)
            .await
        {
            Ok(invoice) => invoice,
            Err(DaoError::NotFound) => return Err(DeliveryError::InvoiceNotFound),
            Err(e) => return Err(e.into()),
        };
        if invoice.status != InvoiceStatus::Pending {
            return Err(DeliveryError::InvoiceResolved);
        }

        let text = self.templates.compose(&MessageContext {
            category: entry.category,
            school_name: &tenant.name,
            payer_name: invoice.payer_name(),
            description: &invoice.description,
            amount_cents: invoice.amount_cents,
            due_date: clock::due_date_local(invoice.due_date, tenant.utc_offset_minutes),
        });
        self.messenger
            .send_text(instance, &entry.target_phone, &text)
            .await?;

        tokio::time::sleep(Duration::from_secs(self.whatsapp.followup_pause_secs)).await;
        self.send_payment_followup(&tenant, &invoice, entry).await?;

        Ok(())
    }

    /// The payment artifact rides behind the message text: the boleto PDF
    /// and its digitable line, or the PIX copy-paste code.
    async fn send_payment_followup(
        &self,
        tenant: &Tenant,
        invoice: &Invoice,
        entry: &NotificationLog,
    ) -> Result<(), WhatsAppError> {
        let instance = tenant.slug.as_str();
        match invoice.payment_channel {
            PaymentChannel::Boleto => {
                if let Some(url) = &invoice.document_url {
                    self.messenger
                        .send_file(
                            instance,
                            &entry.target_phone,
                            url,
                            "boleto.pdf",
                            &invoice.description,
                        )
                        .await?;
                }
                if let Some(line) = &invoice.payment_code {
                    self.messenger
                        .send_text(instance, &entry.target_phone, line)
                        .await?;
                }
            }
            PaymentChannel::Pix => {
                if let Some(code) = &invoice.payment_code {
                    self.messenger
                        .send_text(instance, &entry.target_phone, code)
                        .await?;
                }
            }
        }
        Ok(())
    }

    /// Re-queues this tenant's failures from the current local day.
    /// Attempts are cumulative across retries so chronic failures show up.
    pub async fn retry_failed_today(&self, tenant_id: bson::oid::ObjectId) -> Result<u64, DaoError> {
        let tenant = self.tenants.find_by_id(tenant_id).await?;
        let midnight = clock::local_midnight(tenant.utc_offset_minutes);
        let requeued = self.logs.retry_failed_since(tenant_id, midnight).await?;
        if requeued > 0 {
            info!(%tenant_id, requeued, "Re-queued failed notifications");
        }
        Ok(requeued)
    }
}

fn throttle_secs(min: u64, max: u64) -> u64 {
    if max > min {
        use rand::Rng;
        rand::rng().random_range(min..=max)
    } else {
        min
    }
}
