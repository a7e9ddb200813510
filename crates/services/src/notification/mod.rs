pub mod classify;
pub mod clock;
pub mod processor;
pub mod scanner;
pub mod stats;
pub mod templates;

pub use processor::NotificationProcessor;
pub use scanner::NotificationScanner;
pub use stats::NotificationReporter;
