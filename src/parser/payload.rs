use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use crate::course::non_empty;

static LD_JSON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

const LANGUAGE: &str = "/@graph/2/inLanguage";
const COURSE_INSTANCE: &str = "/@graph/2/hasCourseInstance";
const RATING: &str = "/@graph/1/aggregateRating/ratingValue";

/// The embedded JSON-LD block of a course page.
#[derive(Debug, Clone)]
pub struct StructuredPayload(Value);

impl StructuredPayload {
    /// First `ld+json` script on the page that parses as JSON.
    pub fn find(doc: &Html) -> Option<Self> {
        doc.select(&LD_JSON).find_map(|script| {
            let raw: String = script.text().collect();
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(v) => Some(Self(v)),
                Err(e) => {
                    debug!("Skipping unparsable ld+json block: {}", e);
                    None
                }
            }
        })
    }

    /// Optional nested lookup by JSON pointer.
    pub fn lookup(&self, pointer: &str) -> Option<&Value> {
        self.0.pointer(pointer)
    }

    pub fn language(&self) -> Option<String> {
        self.lookup(LANGUAGE).and_then(leaf_text)
    }

    pub fn start_date(&self) -> Option<String> {
        self.course_instance_field("startDate")
    }

    pub fn end_date(&self) -> Option<String> {
        self.course_instance_field("endDate")
    }

    pub fn rating(&self) -> Option<String> {
        self.lookup(RATING).and_then(leaf_text)
    }

    fn course_instance_field(&self, key: &str) -> Option<String> {
        let instance = match self.lookup(COURSE_INSTANCE)? {
            Value::Array(items) => items.first()?,
            other => other,
        };
        instance.get(key).and_then(leaf_text)
    }
}

impl From<Value> for StructuredPayload {
    fn from(v: Value) -> Self {
        Self(v)
    }
}

/// Render a string or number leaf as text.
fn leaf_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
