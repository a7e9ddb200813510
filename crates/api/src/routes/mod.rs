pub mod health;
pub mod invoice;
pub mod notification;
pub mod notification_config;
pub mod tenant;
