use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::PagePolicy;
use crate::error::ConfigError;

pub const DEFAULT_SITEMAP_URL: &str = "https://www.coursera.org/sitemap~www~courses.xml";
pub const DEFAULT_LIMIT: i64 = 20;

/// Everything a run needs; built by the CLI, never read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub output: PathBuf,
    pub limit: i64,
    pub sitemap_url: String,
    pub policy: PagePolicy,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            limit: DEFAULT_LIMIT,
            sitemap_url: DEFAULT_SITEMAP_URL.to_string(),
            policy: PagePolicy::default(),
            timeout: None,
        }
    }

    /// Checked limit as a count of links. Also refuses workbook paths, which
    /// would otherwise receive delimited text under an `.xlsx` name.
    pub fn validate(&self) -> Result<usize, ConfigError> {
        let ext = self
            .output
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if matches!(ext.as_deref(), Some("xlsx" | "xls" | "xlsm")) {
            return Err(ConfigError::WorkbookOutput(self.output.clone()));
        }
        if self.limit < 1 {
            return Err(ConfigError::InvalidLimit(self.limit));
        }
        usize::try_from(self.limit).map_err(|_| ConfigError::InvalidLimit(self.limit))
    }
}
