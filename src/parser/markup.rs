//! Selectors for the older server-rendered course page layout.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::course::non_empty;

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".BannerTitle h1").unwrap());
static GLANCE_LANGUAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".ProductGlance > :last-of-type h4").unwrap());
static STAR_RATING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".AboutCourse [class*=StarRating] ~ span").unwrap());

// Week entries are keyed "material.weeks.<index>" in the page's inline state.
static WEEKS_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"material\.weeks\.([^"]*)""#).unwrap());

/// Banner heading, whitespace collapsed.
pub fn title(doc: &Html) -> Option<String> {
    doc.select(&TITLE).next().and_then(collapsed_text)
}

/// Heading of the last "product glance" entry. Like the other selectors,
/// the first match in document order wins.
pub fn language(doc: &Html) -> Option<String> {
    doc.select(&GLANCE_LANGUAGE).next().and_then(collapsed_text)
}

/// Span following the star rating widget.
pub fn rating(doc: &Html) -> Option<String> {
    doc.select(&STAR_RATING).next().and_then(collapsed_text)
}

/// Week count from the zero-based `material.weeks.N` markers in raw page text.
/// Markers whose suffix is not all digits are ignored.
pub fn weeks_from_marker(raw_html: &str) -> Option<u32> {
    WEEKS_MARKER
        .captures_iter(raw_html)
        .filter_map(|c| {
            let digits = c.get(1)?.as_str();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse::<u32>().ok()
        })
        .max()
        .and_then(|index| index.checked_add(1))
}

fn collapsed_text(el: ElementRef) -> Option<String> {
    let joined: String = el.text().collect::<Vec<_>>().join(" ");
    non_empty(joined.split_whitespace().collect::<Vec<_>>().join(" "))
}
