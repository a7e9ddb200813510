use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use cobranca_db::models::{NotificationCategory, NotificationStatus};
use serde::Serialize;

use crate::dao::base::DaoResult;
use crate::dao::{InvoiceDao, NotificationConfigDao, NotificationLogDao, TenantDao};

use super::classify::{OVERDUE_CEILING_DAYS, REMINDER_LEAD_DAYS, classify};
use super::clock;
use super::scanner::category_enabled;

/// Read-only aggregations over the queue store for dashboards.
pub struct NotificationReporter {
    tenants: Arc<TenantDao>,
    configs: Arc<NotificationConfigDao>,
    invoices: Arc<InvoiceDao>,
    logs: Arc<NotificationLogDao>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyStats {
    pub queued: u64,
    pub processing: u64,
    pub sent: u64,
    pub failed: u64,
    pub total_today: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub date: NaiveDate,
    pub total_expected: u64,
    pub breakdown: ForecastBreakdown,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ForecastBreakdown {
    pub reminder: u64,
    pub due_today: u64,
    pub overdue: u64,
}

impl NotificationReporter {
    pub fn new(
        tenants: Arc<TenantDao>,
        configs: Arc<NotificationConfigDao>,
        invoices: Arc<InvoiceDao>,
        logs: Arc<NotificationLogDao>,
    ) -> Self {
        Self {
            tenants,
            configs,
            invoices,
            logs,
        }
    }

    /// Today's entry counts per status, bucketed by `updated_at` within
    /// the tenant's local calendar day.
    pub async fn daily_stats(&self, tenant_id: bson::oid::ObjectId) -> DaoResult<DailyStats> {
        let tenant = self.tenants.find_by_id(tenant_id).await?;
        let midnight = clock::local_midnight(tenant.utc_offset_minutes);

        let queued = self
            .logs
            .count_status_since(tenant_id, NotificationStatus::Queued, midnight)
            .await?;
        let processing = self
            .logs
            .count_status_since(tenant_id, NotificationStatus::Processing, midnight)
            .await?;
        let sent = self
            .logs
            .count_status_since(tenant_id, NotificationStatus::Sent, midnight)
            .await?;
        let failed = self
            .logs
            .count_status_since(tenant_id, NotificationStatus::Failed, midnight)
            .await?;
        let total_today = self.logs.count_since(tenant_id, midnight).await?;

        Ok(DailyStats {
            queued,
            processing,
            sent,
            failed,
            total_today,
        })
    }

    /// Dry run of the scanner's eligibility pass against `target`: loads
    /// pending invoices and re-runs the evaluator without enqueueing or
    /// mutating anything, so an operator can preview tomorrow's volume.
    pub async fn forecast(
        &self,
        tenant_id: bson::oid::ObjectId,
        target: NaiveDate,
    ) -> DaoResult<Forecast> {
        let tenant = self.tenants.find_by_id(tenant_id).await?;
        let config = self.configs.get_or_create(tenant_id).await?;
        let offset = tenant.utc_offset_minutes;

        let from = clock::date_to_bson(target - Duration::days(OVERDUE_CEILING_DAYS), offset);
        let to = clock::date_end_to_bson(target + Duration::days(REMINDER_LEAD_DAYS), offset);
        let candidates = self
            .invoices
            .find_pending_in_range(tenant_id, from, to)
            .await?;

        let mut breakdown = ForecastBreakdown::default();
        for invoice in &candidates {
            let due_local = clock::due_date_local(invoice.due_date, offset);
            let Some(category) = classify(due_local, target) else {
                continue;
            };
            if !category_enabled(&config, category) || invoice.target_phone().is_none() {
                continue;
            }
            match category {
                NotificationCategory::Reminder => breakdown.reminder += 1,
                NotificationCategory::DueToday => breakdown.due_today += 1,
                NotificationCategory::Overdue => breakdown.overdue += 1,
                NotificationCategory::NewInvoice => {}
            }
        }

        Ok(Forecast {
            date: target,
            total_expected: breakdown.reminder + breakdown.due_today + breakdown.overdue,
            breakdown,
        })
    }
}
