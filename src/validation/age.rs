//! Calendar-age arithmetic

use chrono::{Datelike, NaiveDate};

/// Parse a birthdate in the `YYYY-MM-DD` form used by date inputs
pub fn parse_birthdate(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Age in whole years on `today`.
///
/// Returns `None` for a birthdate after `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birth > today {
        return None;
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}
