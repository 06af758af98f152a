use chrono::{DateTime, NaiveDate, NaiveDateTime};

const SECONDS_PER_DAY: i64 = 86_400;
const DAYS_PER_WEEK: f64 = 7.0;

/// Parse the date formats seen in course payloads.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Whole days between the two dates divided by seven.
/// `None` when either side fails to parse or the range runs backwards.
pub fn weeks_between(start: &str, end: &str) -> Option<f64> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    let days = (end - start).num_seconds().div_euclid(SECONDS_PER_DAY);
    if days < 0 {
        return None;
    }
    Some(days as f64 / DAYS_PER_WEEK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_formats() {
        assert!(parse_date("2019-01-07").is_some());
        assert!(parse_date("2019-01-07T10:00:00").is_some());
        assert!(parse_date("2019-01-07T10:00:00Z").is_some());
        assert!(parse_date("2019-01-07T10:00:00+02:00").is_some());
        assert!(parse_date("next monday").is_none());
    }

    #[test]
    fn eight_weeks() {
        assert_eq!(weeks_between("2019-01-07", "2019-03-04"), Some(8.0));
    }

    #[test]
    fn partial_days_floor() {
        // 13 days and 23 hours
        assert_eq!(weeks_between("2019-01-01T00:00:00", "2019-01-14T23:00:00"), Some(13.0 / 7.0));
    }

    #[test]
    fn backwards_or_unparsable_is_absent() {
        assert_eq!(weeks_between("2019-03-04", "2019-01-07"), None);
        assert_eq!(weeks_between("soon", "2019-01-07"), None);
    }
}
