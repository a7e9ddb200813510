pub mod invoice;
pub mod notification_config;
pub mod notification_log;
pub mod tenant;

pub use invoice::{Invoice, InvoiceStatus, PaymentChannel};
pub use notification_config::NotificationConfig;
pub use notification_log::{NotificationCategory, NotificationLog, NotificationStatus};
pub use tenant::Tenant;
