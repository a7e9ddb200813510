//! Eligibility evaluator: decides whether an invoice is owed a collection
//! message on a given day, and which kind. Pure so the live scanner and the
//! dry-run forecast cannot drift apart.

use chrono::NaiveDate;
use cobranca_db::models::NotificationCategory;

/// Days before the due date on which the single advance reminder goes out.
pub const REMINDER_LEAD_DAYS: i64 = 3;

/// Debts older than this stop being nagged about; bounds total volume.
pub const OVERDUE_CEILING_DAYS: i64 = 60;

/// `Some(category)` when a message is owed on `reference`, `None` otherwise.
/// Both dates are tenant-local calendar days.
pub fn classify(due_date: NaiveDate, reference: NaiveDate) -> Option<NotificationCategory> {
    let diff_days = (due_date - reference).num_days();

    if diff_days == REMINDER_LEAD_DAYS {
        Some(NotificationCategory::Reminder)
    } else if diff_days == 0 {
        Some(NotificationCategory::DueToday)
    } else if (-OVERDUE_CEILING_DAYS..0).contains(&diff_days) {
        Some(NotificationCategory::Overdue)
    } else {
        None
    }
}
