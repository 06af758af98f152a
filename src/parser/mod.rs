pub mod dates;
pub mod markup;
pub mod payload;

use scraper::Html;

use crate::course::{CourseRecord, Strategy};
use crate::error::ExtractError;
use payload::StructuredPayload;

/// Build a record from one course page.
///
/// The title always comes from the banner heading. When the page embeds a
/// structured payload, every optional field is read from it and nothing else;
/// otherwise the markup selectors and the week markers are used. Only a
/// missing title fails the page.
pub fn extract_course(link: &str, html: &str) -> Result<CourseRecord, ExtractError> {
    let doc = Html::parse_document(html);
    let title = markup::title(&doc).ok_or(ExtractError::MissingTitle)?;

    let record = match StructuredPayload::find(&doc) {
        Some(payload) => {
            let start_date = payload.start_date();
            let duration_weeks = start_date
                .as_deref()
                .zip(payload.end_date())
                .and_then(|(start, end)| dates::weeks_between(start, &end));
            CourseRecord {
                title,
                link: link.to_string(),
                lang: payload.language(),
                start_date,
                duration_weeks,
                rating: payload.rating(),
                source: Strategy::StructuredPayload,
            }
        }
        None => CourseRecord {
            title,
            link: link.to_string(),
            lang: markup::language(&doc),
            start_date: None,
            duration_weeks: markup::weeks_from_marker(html).map(f64::from),
            rating: markup::rating(&doc),
            source: Strategy::Markup,
        },
    };

    Ok(record)
}

// ── Tests ──
