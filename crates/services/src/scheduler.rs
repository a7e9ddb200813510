use std::sync::Arc;

use cobranca_config::Settings;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

use crate::notification::{NotificationProcessor, NotificationScanner};

/// Wires the two background jobs: the hourly invoice scan and the
/// per-minute queue drain. Single-instance by design; running a second
/// replica would double-send messages.
pub async fn start(
    settings: &Settings,
    scanner: Arc<NotificationScanner>,
    processor: Arc<NotificationProcessor>,
) -> anyhow::Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let scan_job = {
        let scanner = Arc::clone(&scanner);
        Job::new_async(settings.notification.scan_cron.as_str(), move |_id, _l| {
            let scanner = Arc::clone(&scanner);
            Box::pin(async move {
                scanner.scan().await;
            })
        })?
    };
    scheduler.add(scan_job).await?;

    let drain_job = {
        let processor = Arc::clone(&processor);
        Job::new_async(settings.notification.drain_cron.as_str(), move |_id, _l| {
            let processor = Arc::clone(&processor);
            Box::pin(async move {
                processor.drain().await;
            })
        })?
    };
    scheduler.add(drain_job).await?;

    scheduler.start().await?;
    info!(
        scan_cron = %settings.notification.scan_cron,
        drain_cron = %settings.notification.drain_cron,
        "Notification jobs scheduled"
    );

    Ok(scheduler)
}
