use std::sync::Arc;

use chrono::{Duration, Timelike};
use cobranca_db::models::{Invoice, NotificationCategory, NotificationConfig, Tenant};
use tracing::{debug, info, warn};

use crate::dao::base::DaoResult;
use crate::dao::{InvoiceDao, NotificationConfigDao, NotificationLogDao, TenantDao};
use crate::events::NotificationEvents;

use super::classify::{OVERDUE_CEILING_DAYS, REMINDER_LEAD_DAYS, classify};
use super::clock;

/// Hourly job that turns eligible pending invoices into queued
/// notification log entries. Also runnable on demand from the admin API.
pub struct NotificationScanner {
    tenants: Arc<TenantDao>,
    configs: Arc<NotificationConfigDao>,
    invoices: Arc<InvoiceDao>,
    logs: Arc<NotificationLogDao>,
    events: NotificationEvents,
}

impl NotificationScanner {
    pub fn new(
        tenants: Arc<TenantDao>,
        configs: Arc<NotificationConfigDao>,
        invoices: Arc<InvoiceDao>,
        logs: Arc<NotificationLogDao>,
        events: NotificationEvents,
    ) -> Self {
        Self {
            tenants,
            configs,
            invoices,
            logs,
            events,
        }
    }

    /// Never returns an error to the scheduler: every tenant-level failure
    /// is logged and the scan moves on.
    pub async fn scan(&self) {
        let configs = match self.configs.find_active().await {
            Ok(configs) => configs,
            Err(e) => {
                warn!(%e, "Scan aborted: could not load tenant configs");
                return;
            }
        };

        info!(tenants = configs.len(), "Scanning for eligible invoices");

        for config in configs {
            match self.scan_tenant(&config).await {
                Ok(enqueued) if enqueued > 0 => {
                    info!(tenant_id = %config.tenant_id, enqueued, "Scan enqueued notifications");
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(tenant_id = %config.tenant_id, %e, "Tenant scan failed");
                }
            }
        }
    }

    async fn scan_tenant(&self, config: &NotificationConfig) -> DaoResult<u32> {
        let tenant = self.tenants.find_by_id(config.tenant_id).await?;
        let offset = tenant.utc_offset_minutes;

        let now = clock::tenant_now(offset);
        let minutes_now = now.hour() * 60 + now.minute();
        if !clock::within_window(&config.window_start, &config.window_end, minutes_now) {
            debug!(
                tenant_id = %config.tenant_id,
                window_start = %config.window_start,
                window_end = %config.window_end,
                "Outside sending window, skipping tenant"
            );
            return Ok(0);
        }

        let today = now.date_naive();
        // Wide slice for due-today/overdue, narrow slice for the reminder
        // lookahead. classify() remains the source of truth per invoice.
        let overdue_from = clock::date_to_bson(today - Duration::days(OVERDUE_CEILING_DAYS), offset);
        let overdue_to = clock::date_end_to_bson(today, offset);
        let reminder_day = today + Duration::days(REMINDER_LEAD_DAYS);
        let reminder_from = clock::date_to_bson(reminder_day, offset);
        let reminder_to = clock::date_end_to_bson(reminder_day, offset);

        let mut candidates = self
            .invoices
            .find_pending_in_range(config.tenant_id, overdue_from, overdue_to)
            .await?;
        candidates.extend(
            self.invoices
                .find_pending_in_range(config.tenant_id, reminder_from, reminder_to)
                .await?,
        );

        let midnight = clock::local_midnight(offset);
        let mut enqueued = 0u32;

        for invoice in &candidates {
            match self.consider_invoice(&tenant, config, invoice, today, midnight).await {
                Ok(true) => enqueued += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        tenant_id = %config.tenant_id,
                        invoice_id = ?invoice.id,
                        %e,
                        "Invoice scan failed"
                    );
                }
            }
        }

        Ok(enqueued)
    }

    async fn consider_invoice(
        &self,
        tenant: &Tenant,
        config: &NotificationConfig,
        invoice: &Invoice,
        today: chrono::NaiveDate,
        midnight: bson::DateTime,
    ) -> DaoResult<bool> {
        let due_local = clock::due_date_local(invoice.due_date, tenant.utc_offset_minutes);
        let Some(category) = classify(due_local, today) else {
            return Ok(false);
        };

        if !category_enabled(config, category) {
            return Ok(false);
        }

        // One enqueue per invoice per local calendar day, any category.
        let invoice_id = invoice.id.ok_or(crate::dao::base::DaoError::NotFound)?;
        if self.logs.has_entry_since(invoice_id, midnight).await? {
            return Ok(false);
        }
        if self.logs.has_open_entry(invoice_id, category).await? {
            return Ok(false);
        }

        // Unreachable payers are skipped silently, not logged as failures.
        let Some(phone) = invoice.target_phone() else {
            return Ok(false);
        };

        let entry = self
            .logs
            .enqueue(invoice, category, phone.to_string())
            .await?;
        self.events.emit_created(entry);
        Ok(true)
    }
}

pub fn category_enabled(config: &NotificationConfig, category: NotificationCategory) -> bool {
    match category {
        NotificationCategory::Reminder => config.enable_reminder,
        NotificationCategory::DueToday => config.enable_due_today,
        NotificationCategory::Overdue => config.enable_overdue,
        NotificationCategory::NewInvoice => true,
    }
}
