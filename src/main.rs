mod app;
mod catalog;
mod config;
mod course;
mod error;
mod fetcher;
mod parser;
mod sitemap;
mod writer;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;

use catalog::PagePolicy;
use config::{Config, DEFAULT_LIMIT, DEFAULT_SITEMAP_URL};
use fetcher::HttpFetcher;

#[derive(Parser)]
#[command(
    name = "course_catalog",
    about = "Coursera parser: collects course information from the catalog sitemap into a spreadsheet file"
)]
struct Cli {
    /// Path to result file (.csv or .tsv); must not exist yet
    output: PathBuf,

    /// Limit courses
    #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT, allow_negative_numbers = true)]
    limit: i64,

    /// Sitemap listing the course pages
    #[arg(long, default_value = DEFAULT_SITEMAP_URL)]
    sitemap_url: String,

    /// Abort on the first page that cannot be fetched or parsed
    #[arg(long)]
    fail_fast: bool,

    /// HTTP timeout per request, in seconds (default: none)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            output: cli.output,
            limit: cli.limit,
            sitemap_url: cli.sitemap_url,
            policy: if cli.fail_fast {
                PagePolicy::FailFast
            } else {
                PagePolicy::Isolate
            },
            timeout: cli.timeout_secs.map(Duration::from_secs),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let config = Config::from(Cli::parse());
    let fetcher = HttpFetcher::new(config.timeout);

    let status = app::run(&config, &fetcher).await;
    let code = status.report();

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    code
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
