use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::course::CourseRecord;
use crate::error::{self, AppError};
use crate::fetcher::PageFetcher;
use crate::parser;

/// What to do when a single page cannot be fetched or has no title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PagePolicy {
    /// Log and skip the page, keep going.
    #[default]
    Isolate,
    /// Abort the whole batch on the first bad page.
    FailFast,
}

/// Records in link order, plus the links that were skipped.
#[derive(Debug, Default)]
pub struct Catalog {
    pub records: Vec<CourseRecord>,
    pub failures: Vec<(String, String)>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Fetch and extract each link in turn. One page at a time, no retries.
pub async fn build_catalog<F: PageFetcher + ?Sized>(
    fetcher: &F,
    links: &[String],
    policy: PagePolicy,
) -> Result<Catalog, AppError> {
    let mut catalog = Catalog::default();
    if links.is_empty() {
        return Ok(catalog);
    }

    let pb = ProgressBar::new(links.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    for link in links {
        pb.set_message(link.clone());
        match fetch_one(fetcher, link).await {
            Ok(record) => {
                debug!("{} -> {:?} ({:?})", link, record.title, record.source);
                catalog.records.push(record);
            }
            Err(e) if policy == PagePolicy::Isolate => {
                let reason = error::chain(&e);
                warn!("Skipping {}: {}", link, reason);
                catalog.failures.push((link.clone(), reason));
            }
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Collected {} pages ({} ok, {} skipped)",
        links.len(),
        catalog.records.len(),
        catalog.failures.len()
    );
    Ok(catalog)
}

async fn fetch_one<F: PageFetcher + ?Sized>(fetcher: &F, link: &str) -> Result<CourseRecord, AppError> {
    let html = fetcher.fetch(link).await.map_err(AppError::PageFetch)?;
    parser::extract_course(link, &html).map_err(|source| AppError::Extract {
        link: link.to_string(),
        source,
    })
}
