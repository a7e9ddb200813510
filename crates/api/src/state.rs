use std::sync::Arc;

use cobranca_config::Settings;
use cobranca_services::{
    InvoiceDao, Messenger, NotificationConfigDao, NotificationEvents, NotificationLogDao,
    NotificationProcessor, NotificationReporter, NotificationScanner, TenantDao, WhatsAppClient,
    notification::templates::{RotatingTemplates, TemplateProvider},
};
use mongodb::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub tenants: Arc<TenantDao>,
    pub configs: Arc<NotificationConfigDao>,
    pub invoices: Arc<InvoiceDao>,
    pub logs: Arc<NotificationLogDao>,
    pub scanner: Arc<NotificationScanner>,
    pub processor: Arc<NotificationProcessor>,
    pub reporter: Arc<NotificationReporter>,
    pub events: NotificationEvents,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let messenger: Arc<dyn Messenger> = Arc::new(WhatsAppClient::new(
            settings.whatsapp.base_url.clone(),
            settings.whatsapp.api_key.clone(),
        ));
        Self::with_messenger(db, settings, messenger, Arc::new(RotatingTemplates))
    }

    /// Build the state with an injected messaging capability and template
    /// provider. Used by tests to avoid a live gateway.
    pub fn with_messenger(
        db: Database,
        settings: Settings,
        messenger: Arc<dyn Messenger>,
        templates: Arc<dyn TemplateProvider>,
    ) -> Self {
        let tenants = Arc::new(TenantDao::new(&db));
        let configs = Arc::new(NotificationConfigDao::new(&db));
        let invoices = Arc::new(InvoiceDao::new(&db));
        let logs = Arc::new(NotificationLogDao::new(&db));
        let events = NotificationEvents::new();

        let scanner = Arc::new(NotificationScanner::new(
            Arc::clone(&tenants),
            Arc::clone(&configs),
            Arc::clone(&invoices),
            Arc::clone(&logs),
            events.clone(),
        ));
        let processor = Arc::new(NotificationProcessor::new(
            Arc::clone(&tenants),
            Arc::clone(&invoices),
            Arc::clone(&logs),
            messenger,
            templates,
            events.clone(),
            settings.notification.clone(),
            settings.whatsapp.clone(),
        ));
        let reporter = Arc::new(NotificationReporter::new(
            Arc::clone(&tenants),
            Arc::clone(&configs),
            Arc::clone(&invoices),
            Arc::clone(&logs),
        ));

        Self {
            db,
            settings,
            tenants,
            configs,
            invoices,
            logs,
            scanner,
            processor,
            reporter,
            events,
        }
    }
}
