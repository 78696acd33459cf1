use std::sync::OnceLock;

use ::time::{
    format_description::{well_known::{Iso8601, Rfc2822, Rfc3339}, BorrowedFormatItem},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
};
use tracing::warn;

pub const INVALID_TIME: &str = "Invalid Time";

const LOCAL_DATE_TIME: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
);

const DATE_ONLY: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Captures the machine's utc offset. The offset can only be read reliably
/// while the process is single threaded, so call this before starting a runtime.
pub fn init_local_offset() -> UtcOffset {
    *LOCAL_OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}

pub fn local_offset() -> UtcOffset {
    match LOCAL_OFFSET.get() {
        Some(offset) => *offset,
        None => UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
    }
}

/// Local wall-clock time, as stamped on outgoing messages.
pub fn wall_clock() -> String {
    let now = OffsetDateTime::now_utc().to_offset(local_offset());
    format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second())
}

/// `HH:MM` for display, in the local offset.
pub fn format_time(value: &str) -> String {
    format_time_in(value, local_offset())
}

/// Full date-times are tried first. A bare `14:30` is not one and falls
/// through to the clock split. Anything else becomes [`INVALID_TIME`].
pub fn format_time_in(value: &str, offset: UtcOffset) -> String {
    if let Some((hours, minutes)) = parse_date_time(value, offset) {
        return format!("{hours:02}:{minutes:02}");
    }

    if let Some((hours, minutes)) = parse_clock(value) {
        return format!("{hours:02}:{minutes:02}");
    }

    warn!("invalid time format: {value:?}");
    INVALID_TIME.to_owned()
}

fn parse_date_time(value: &str, offset: UtcOffset) -> Option<(u8, u8)> {
    let value = value.trim();
    if let Ok(at) = OffsetDateTime::parse(value, &Rfc2822) {
        let at = at.to_offset(offset);
        return Some((at.hour(), at.minute()));
    }

    // a bare date is midnight utc
    if let Ok(date) = Date::parse(value, DATE_ONLY) {
        let at = date.midnight().assume_utc().to_offset(offset);
        return Some((at.hour(), at.minute()));
    }

    let value = normalize_separator(value);

    let absolute = OffsetDateTime::parse(&value, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(&value, &Iso8601::PARSING));
    if let Ok(at) = absolute {
        let at = at.to_offset(offset);
        return Some((at.hour(), at.minute()));
    }

    // no offset given, so it already is wall-clock time
    PrimitiveDateTime::parse(&value, LOCAL_DATE_TIME)
        .ok()
        .map(|at| (at.hour(), at.minute()))
}

fn normalize_separator(value: &str) -> String {
    if value.len() > 11 && value.as_bytes()[10] == b' ' {
        format!("{}T{}", &value[..10], &value[11..])
    } else {
        value.to_owned()
    }
}

fn parse_clock(value: &str) -> Option<(u64, u64)> {
    let mut parts = value.trim().split(':');
    let hours = parts.next()?.trim();
    let minutes = parts.next()?.trim();

    let numeric = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !numeric(hours) || !numeric(minutes) {
        return None;
    }

    Some((hours.parse().ok()?, minutes.parse().ok()?))
}
