use serde::Serialize;

/// Placeholder written for any field a page did not provide.
pub const UNKNOWN: &str = "Unknown";

/// Which extraction path produced the optional fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    StructuredPayload,
    Markup,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseRecord {
    pub title: String,
    pub link: String,
    pub lang: Option<String>,
    pub start_date: Option<String>,
    pub duration_weeks: Option<f64>,
    pub rating: Option<String>,
    pub source: Strategy,
}

/// One output row. Field order is the header order.
#[derive(Debug, Serialize)]
pub struct CourseRow<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub lang: &'a str,
    pub start_date: &'a str,
    pub duration_weeks: String,
    pub rating: &'a str,
}

impl<'a> From<&'a CourseRecord> for CourseRow<'a> {
    fn from(c: &'a CourseRecord) -> Self {
        CourseRow {
            title: &c.title,
            link: &c.link,
            lang: c.lang.as_deref().unwrap_or(UNKNOWN),
            start_date: c.start_date.as_deref().unwrap_or(UNKNOWN),
            duration_weeks: c
                .duration_weeks
                .map(|w| w.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            rating: c.rating.as_deref().unwrap_or(UNKNOWN),
        }
    }
}

/// Trim and drop empty strings so blank page text counts as missing.
pub fn non_empty(s: impl AsRef<str>) -> Option<String> {
    let t = s.as_ref().trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}
