//! Calendar-date normalisation and day arithmetic.
//!
//! Every date the engine works with is a [`NaiveDate`]: a day on the local
//! calendar with no time-of-day attached. Inputs that carry a time (timestamps,
//! date-time strings) are reduced to their local calendar day first.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};
use regex::Regex;

use crate::status::Locale;

/// Generic formats tried after the strict `YYYY-M-D` / `YYYY/M/D` form fails.
const FALLBACK_DATE_FORMATS: &[&str] = &["%Y%m%d", "%b %d, %Y", "%B %d, %Y", "%d %b %Y", "%d %B %Y"];

/// Generic date-time formats; the time part is discarded.
const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Values that can be reduced to a calendar date.
///
/// Reduction is idempotent: a [`NaiveDate`] reduces to itself.
pub trait ToDateOnly {
    /// The local calendar day this value denotes, or `None` if it denotes no
    /// valid day (an unparseable string).
    fn to_date_only(&self) -> Option<NaiveDate>;
}

impl ToDateOnly for NaiveDate {
    fn to_date_only(&self) -> Option<NaiveDate> {
        Some(*self)
    }
}

impl ToDateOnly for NaiveDateTime {
    fn to_date_only(&self) -> Option<NaiveDate> {
        Some(self.date())
    }
}

impl<Tz: TimeZone> ToDateOnly for DateTime<Tz> {
    fn to_date_only(&self) -> Option<NaiveDate> {
        Some(self.with_timezone(&Local).date_naive())
    }
}

impl ToDateOnly for str {
    fn to_date_only(&self) -> Option<NaiveDate> {
        parse_date(self)
    }
}

impl ToDateOnly for String {
    fn to_date_only(&self) -> Option<NaiveDate> {
        parse_date(self)
    }
}

impl<T: ToDateOnly + ?Sized> ToDateOnly for &T {
    fn to_date_only(&self) -> Option<NaiveDate> {
        (**self).to_date_only()
    }
}

/// Strip time-of-day from `value`, returning its calendar date.
pub fn date_only<T: ToDateOnly + ?Sized>(value: &T) -> Option<NaiveDate> {
    value.to_date_only()
}

/// Parse a date string.
///
/// `YYYY-MM-DD` and `YYYY/MM/DD` (month and day may be a single digit) are
/// recognised directly. Anything else goes through a set of generic formats;
/// strings that match none of them yield `None`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(date) = parse_calendar_form(trimmed) {
        return Some(date);
    }

    parse_generic(trimmed)
}

/// Strict `YYYY[-/]M[-/]D` form. Mixed separators are accepted.
fn parse_calendar_form(input: &str) -> Option<NaiveDate> {
    let re = Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})$").ok()?;
    let caps = re.captures(input)?;

    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_generic(input: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return dt.to_date_only();
    }

    FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        })
}

/// Today's date on the local calendar.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Signed number of days from `today` to `event`.
///
/// Negative means the event is in the past, zero means it is today. Both
/// sides are whole days, so any partial day has already been rounded up to
/// the next calendar date by [`date_only`].
pub fn days_until(event: NaiveDate, today: NaiveDate) -> i64 {
    event.signed_duration_since(today).num_days()
}

/// [`days_until`] measured from the local current date.
pub fn days_until_today(event: NaiveDate) -> i64 {
    days_until(event, today())
}

/// Add a signed number of days, saturating at the representable range.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}

/// Long display form: `YYYY/MM/DD`.
pub fn format_date_long(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

/// Short display form used on the axis: `1月18日` or `Jan 18`.
pub fn format_date_short(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::ZhTw => date.format("%-m月%-d日").to_string(),
        Locale::En => date.format("%b %-d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_dash_and_slash_agree() {
        assert_eq!(parse_date("2025-01-18"), Some(d(2025, 1, 18)));
        assert_eq!(parse_date("2025/01/18"), Some(d(2025, 1, 18)));
        assert_eq!(parse_date("2025-1-8"), Some(d(2025, 1, 8)));
        assert_eq!(parse_date("2025/1/8"), Some(d(2025, 1, 8)));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_date("  2025-03-15\n"), Some(d(2025, 3, 15)));
    }

    #[test]
    fn test_parse_rejects_impossible_calendar_date() {
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date("2025/13/01"), None);
    }

    #[test]
    fn test_parse_generic_fallbacks() {
        assert_eq!(parse_date("20250712"), Some(d(2025, 7, 12)));
        assert_eq!(parse_date("Jul 12, 2025"), Some(d(2025, 7, 12)));
        assert_eq!(parse_date("12 July 2025"), Some(d(2025, 7, 12)));
        assert_eq!(parse_date("2025-07-12T09:30"), Some(d(2025, 7, 12)));
        assert_eq!(parse_date("2025-07-12 23:59:59"), Some(d(2025, 7, 12)));
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2025-07"), None);
    }

    #[test]
    fn test_rfc3339_reduces_to_local_day() {
        let stamp = Local
            .with_ymd_and_hms(2025, 5, 15, 12, 0, 0)
            .single()
            .unwrap()
            .to_rfc3339();
        assert_eq!(parse_date(&stamp), Some(d(2025, 5, 15)));
    }

    #[test]
    fn test_date_only_is_idempotent() {
        let once = date_only("2025/4/30").unwrap();
        assert_eq!(date_only(&once), Some(once));

        let naive = d(2025, 4, 30).and_time(NaiveTime::from_hms_opt(18, 45, 0).unwrap());
        assert_eq!(date_only(&naive), Some(d(2025, 4, 30)));
    }

    #[test]
    fn test_date_only_from_datetime() {
        let now = Utc::now();
        assert_eq!(
            date_only(&now),
            Some(now.with_timezone(&Local).date_naive())
        );
    }

    #[test]
    fn test_days_until_same_day_is_zero() {
        let day = d(2025, 1, 18);
        assert_eq!(days_until(day, day), 0);
    }

    #[test]
    fn test_days_until_signs() {
        let today = d(2025, 1, 18);
        assert_eq!(days_until(d(2025, 1, 19), today), 1);
        assert_eq!(days_until(d(2025, 1, 10), today), -8);
        assert_eq!(days_until(d(2025, 3, 15), today), 56);
    }

    #[test]
    fn test_days_until_antisymmetric() {
        let a = d(2024, 11, 15);
        let b = d(2025, 8, 7);
        assert_eq!(days_until(a, b), -days_until(b, a));
    }

    #[test]
    fn test_days_until_across_leap_day() {
        assert_eq!(days_until(d(2024, 3, 1), d(2024, 2, 28)), 2);
        assert_eq!(days_until(d(2025, 3, 1), d(2025, 2, 28)), 1);
    }

    #[test]
    fn test_add_days() {
        assert_eq!(add_days(d(2025, 5, 15), -15), d(2025, 4, 30));
        assert_eq!(add_days(d(2025, 5, 15), 15), d(2025, 5, 30));
        assert_eq!(add_days(d(2025, 12, 31), 1), d(2026, 1, 1));
    }

    #[test]
    fn test_add_days_saturates() {
        assert_eq!(add_days(NaiveDate::MAX, 1), NaiveDate::MAX);
        assert_eq!(add_days(NaiveDate::MIN, -1), NaiveDate::MIN);
        assert_eq!(add_days(d(2025, 1, 1), i64::MAX), NaiveDate::MAX);
    }

    #[test]
    fn test_format_date_long() {
        assert_eq!(format_date_long(d(2025, 1, 8)), "2025/01/08");
    }

    #[test]
    fn test_format_date_short() {
        assert_eq!(format_date_short(d(2025, 1, 8), Locale::ZhTw), "1月8日");
        assert_eq!(format_date_short(d(2025, 12, 25), Locale::En), "Dec 25");
    }
}
