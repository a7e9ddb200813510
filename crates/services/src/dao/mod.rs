pub mod base;
pub mod invoice;
pub mod notification_config;
pub mod notification_log;
pub mod tenant;

pub use base::BaseDao;
pub use invoice::InvoiceDao;
pub use notification_config::NotificationConfigDao;
pub use notification_log::NotificationLogDao;
pub use tenant::TenantDao;
