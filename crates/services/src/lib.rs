pub mod dao;
pub mod events;
pub mod notification;
pub mod scheduler;
pub mod whatsapp;

pub use dao::*;
pub use events::{NotificationEvent, NotificationEventKind, NotificationEvents};
pub use notification::{NotificationProcessor, NotificationReporter, NotificationScanner};
pub use whatsapp::{Messenger, WhatsAppClient, WhatsAppError};
