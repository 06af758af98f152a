use std::process::ExitCode;

use tracing::{info, warn};

use crate::catalog;
use crate::config::Config;
use crate::error::AppError;
use crate::fetcher::PageFetcher;
use crate::sitemap;
use crate::writer;

#[derive(Debug)]
pub struct RunSummary {
    pub discovered: usize,
    pub written: usize,
    pub skipped: usize,
}

/// How a run ended; turned into a process exit code by `main`.
#[derive(Debug)]
pub enum ExitStatus {
    Completed(RunSummary),
    Failed(AppError),
}

impl ExitStatus {
    pub fn report(&self) -> ExitCode {
        match self {
            ExitStatus::Completed(s) => {
                info!("{} of {} discovered courses written", s.written, s.discovered);
                if s.skipped > 0 {
                    println!("{} course page(s) skipped, see log for details", s.skipped);
                }
                println!("Check information in output file");
                ExitCode::SUCCESS
            }
            ExitStatus::Failed(e) => {
                eprintln!("{}", e);
                let mut source = std::error::Error::source(e);
                while let Some(cause) = source {
                    eprintln!("  caused by: {}", cause);
                    source = cause.source();
                }
                ExitCode::from(e.exit_code())
            }
        }
    }
}

/// Discover, fetch, extract, write. Pre-flight checks run before any request.
pub async fn run<F: PageFetcher + ?Sized>(config: &Config, fetcher: &F) -> ExitStatus {
    match try_run(config, fetcher).await {
        Ok(summary) => ExitStatus::Completed(summary),
        Err(e) => ExitStatus::Failed(e),
    }
}

async fn try_run<F: PageFetcher + ?Sized>(config: &Config, fetcher: &F) -> Result<RunSummary, AppError> {
    let limit = config.validate()?;
    if config.output.exists() {
        return Err(AppError::OutputExists(config.output.clone()));
    }

    println!(
        "We're going to collect information about {} course(s). Please wait",
        limit
    );

    let mut links = sitemap::fetch_course_urls(fetcher, &config.sitemap_url).await?;
    let discovered = links.len();
    links.truncate(limit);
    if links.is_empty() {
        return Err(AppError::NoCourses);
    }
    info!("Processing {} of {} courses", links.len(), discovered);

    let catalog = catalog::build_catalog(fetcher, &links, config.policy).await?;
    if catalog.is_empty() {
        warn!("Every page failed; nothing to write");
        return Err(AppError::NoCourses);
    }

    let written = writer::write_courses(&config.output, &catalog.records)?;
    Ok(RunSummary {
        discovered,
        written,
        skipped: catalog.failures.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{course_page, StaticFetcher};
    use crate::catalog::PagePolicy;
    use crate::config::DEFAULT_SITEMAP_URL;
    use crate::error::ConfigError;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("course_catalog_app_{}_{}", std::process::id(), name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sitemap_with(links: &[String]) -> String {
        let body: String = links.iter().map(|l| format!("<url><loc>{}</loc></url>", l)).collect();
        format!(
            r#"<?xml version="1.0"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
            body
        )
    }

    fn site(n: usize) -> (Vec<String>, StaticFetcher) {
        let links: Vec<String> = (0..n).map(|i| format!("https://www.coursera.org/learn/c{}", i)).collect();
        let fetcher = links.iter().fold(
            StaticFetcher::default().with(DEFAULT_SITEMAP_URL, &sitemap_with(&links)),
            |f, l| f.with(l, &course_page(l)),
        );
        (links, fetcher)
    }

    #[tokio::test]
    async fn limit_takes_first_links_in_order() {
        let (links, fetcher) = site(10);
        let out = scratch("limit").join("courses.csv");
        let config = Config { limit: 3, ..Config::new(&out) };

        let status = run(&config, &fetcher).await;
        assert!(matches!(status, ExitStatus::Completed(RunSummary { discovered: 10, written: 3, skipped: 0 })));

        let mut expected = vec![DEFAULT_SITEMAP_URL.to_string()];
        expected.extend(links[..3].iter().cloned());
        assert_eq!(fetcher.calls(), expected);

        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 4);
    }

    #[tokio::test]
    async fn existing_output_stops_before_network() {
        let (_, fetcher) = site(2);
        let out = scratch("exists").join("courses.csv");
        std::fs::write(&out, "old").unwrap();

        let status = run(&Config::new(&out), &fetcher).await;
        assert!(matches!(status, ExitStatus::Failed(AppError::OutputExists(_))));
        assert!(fetcher.calls().is_empty());
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "old");
    }

    #[tokio::test]
    async fn invalid_limit_stops_before_network() {
        let (_, fetcher) = site(2);
        let config = Config { limit: 0, ..Config::new(scratch("limit0").join("c.csv")) };
        let status = run(&config, &fetcher).await;
        assert!(matches!(status, ExitStatus::Failed(AppError::Config(ConfigError::InvalidLimit(0)))));
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn workbook_output_stops_before_network() {
        let (_, fetcher) = site(2);
        let out = scratch("xlsx").join("courses.xlsx");
        let status = run(&Config::new(&out), &fetcher).await;
        assert!(matches!(status, ExitStatus::Failed(AppError::Config(ConfigError::WorkbookOutput(_)))));
        assert!(fetcher.calls().is_empty());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn empty_sitemap_means_no_courses() {
        let (_, fetcher) = site(0);
        let out = scratch("empty").join("courses.csv");
        let status = run(&Config::new(&out), &fetcher).await;
        assert!(matches!(status, ExitStatus::Failed(AppError::NoCourses)));
        assert_eq!(fetcher.calls(), vec![DEFAULT_SITEMAP_URL.to_string()]);
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn malformed_sitemap_aborts() {
        let fetcher = StaticFetcher::default().with(DEFAULT_SITEMAP_URL, "<urlset><url>");
        let out = scratch("malformed").join("courses.csv");
        let status = run(&Config::new(&out), &fetcher).await;
        assert!(matches!(status, ExitStatus::Failed(AppError::Sitemap(_))));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn fail_fast_writes_nothing() {
        let (links, fetcher) = site(3);
        let fetcher = fetcher.with(&links[1], "<p>no title</p>");
        let out = scratch("failfast").join("courses.csv");
        let config = Config { policy: PagePolicy::FailFast, ..Config::new(&out) };
        let status = run(&config, &fetcher).await;
        assert!(matches!(status, ExitStatus::Failed(AppError::Extract { .. })));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn isolate_writes_partial_results() {
        let (links, fetcher) = site(3);
        let fetcher = fetcher.with(&links[1], "<p>no title</p>");
        let out = scratch("isolate").join("courses.csv");
        let status = run(&Config::new(&out), &fetcher).await;
        assert!(matches!(status, ExitStatus::Completed(RunSummary { written: 2, skipped: 1, .. })));
    }

    #[tokio::test]
    async fn unwritable_output_fails() {
        let (_, fetcher) = site(1);
        let out = scratch("unwritable").join("missing-dir").join("courses.csv");
        let status = run(&Config::new(&out), &fetcher).await;
        assert!(matches!(status, ExitStatus::Failed(AppError::Write(_))));
    }
}
