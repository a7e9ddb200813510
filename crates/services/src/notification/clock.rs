//! Tenant-local wall-clock arithmetic. Every "today", "midnight" and
//! sending-window decision goes through a tenant's UTC offset so two
//! schools in different states each get their own calendar day.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

pub fn tenant_offset(utc_offset_minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_minutes * 60)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"))
}

pub fn tenant_now(utc_offset_minutes: i32) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&tenant_offset(utc_offset_minutes))
}

pub fn local_today(utc_offset_minutes: i32) -> NaiveDate {
    tenant_now(utc_offset_minutes).date_naive()
}

/// Start of the tenant-local current day, as a BSON timestamp for queries.
pub fn local_midnight(utc_offset_minutes: i32) -> bson::DateTime {
    let offset = tenant_offset(utc_offset_minutes);
    let midnight = local_today(utc_offset_minutes)
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time");
    let instant = offset
        .from_local_datetime(&midnight)
        .single()
        .expect("fixed offsets have no DST gaps");
    bson::DateTime::from_chrono(instant.with_timezone(&Utc))
}

/// Interprets a stored due date in the tenant's local calendar.
pub fn due_date_local(due: bson::DateTime, utc_offset_minutes: i32) -> NaiveDate {
    due.to_chrono()
        .with_timezone(&tenant_offset(utc_offset_minutes))
        .date_naive()
}

/// Converts a tenant-local date to the BSON timestamp of its local midnight.
pub fn date_to_bson(date: NaiveDate, utc_offset_minutes: i32) -> bson::DateTime {
    let offset = tenant_offset(utc_offset_minutes);
    let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is a valid time");
    let instant = offset
        .from_local_datetime(&midnight)
        .single()
        .expect("fixed offsets have no DST gaps");
    bson::DateTime::from_chrono(instant.with_timezone(&Utc))
}

/// End of a tenant-local date (23:59:59), for inclusive due-date ranges.
pub fn date_end_to_bson(date: NaiveDate, utc_offset_minutes: i32) -> bson::DateTime {
    let offset = tenant_offset(utc_offset_minutes);
    let end = date
        .and_hms_opt(23, 59, 59)
        .expect("end of day is a valid time");
    let instant = offset
        .from_local_datetime(&end)
        .single()
        .expect("fixed offsets have no DST gaps");
    bson::DateTime::from_chrono(instant.with_timezone(&Utc))
}

/// Parses "HH:MM" into minutes since midnight.
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (h, m) = value.split_once(':')?;
    let h: u32 = h.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    if h > 23 || m > 59 {
        return None;
    }
    Some(h * 60 + m)
}

/// Half-open containment check: `[start, end)`. Unparseable bounds close
/// the window rather than opening it.
pub fn within_window(window_start: &str, window_end: &str, minutes_now: u32) -> bool {
    match (parse_hhmm(window_start), parse_hhmm(window_end)) {
        (Some(start), Some(end)) => minutes_now >= start && minutes_now < end,
        _ => false,
    }
}
