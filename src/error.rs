use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SitemapError {
    #[error("malformed sitemap XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },
}

#[derive(Debug, thiserror::Error)]
#[error("failed to fetch {url}")]
pub struct FetchError {
    pub url: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("page has no course title (.BannerTitle h1)")]
    MissingTitle,
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("can't write to file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write CSV row")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("limit should be at least 1 (got {0})")]
    InvalidLimit(i64),
    #[error("{} is a workbook path; only .csv and .tsv output is written", .0.display())]
    WorkbookOutput(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("file already exists: {}", .0.display())]
    OutputExists(PathBuf),
    #[error("could not load sitemap")]
    SitemapFetch(#[source] FetchError),
    #[error(transparent)]
    Sitemap(#[from] SitemapError),
    #[error("no courses found")]
    NoCourses,
    #[error(transparent)]
    PageFetch(FetchError),
    #[error("failed to extract {link}")]
    Extract {
        link: String,
        #[source]
        source: ExtractError,
    },
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// An error and its sources on one line, outermost first.
pub fn chain(e: &dyn std::error::Error) -> String {
    let mut line = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        line.push_str(": ");
        line.push_str(&cause.to_string());
        source = cause.source();
    }
    line
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 2,
            AppError::OutputExists(_) => 3,
            AppError::NoCourses => 4,
            AppError::SitemapFetch(_) | AppError::Sitemap(_) => 5,
            AppError::PageFetch(_) | AppError::Extract { .. } => 6,
            AppError::Write(WriteError::AlreadyExists(_)) => 3,
            AppError::Write(_) => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_classes_have_distinct_codes() {
        let codes = [
            AppError::Config(ConfigError::InvalidLimit(0)).exit_code(),
            AppError::OutputExists(PathBuf::from("out.csv")).exit_code(),
            AppError::NoCourses.exit_code(),
            AppError::Extract { link: "x".into(), source: ExtractError::MissingTitle }.exit_code(),
        ];
        assert!(codes.iter().all(|&c| c != 0));
        let mut dedup = codes.to_vec();
        dedup.dedup();
        assert_eq!(dedup.len(), codes.len());
    }

    #[test]
    fn chain_joins_sources() {
        let e = AppError::Extract { link: "https://x".into(), source: ExtractError::MissingTitle };
        assert_eq!(
            chain(&e),
            "failed to extract https://x: page has no course title (.BannerTitle h1)"
        );
    }

    #[test]
    fn late_exists_maps_to_exists_code() {
        let late = AppError::Write(WriteError::AlreadyExists(PathBuf::from("out.csv")));
        assert_eq!(late.exit_code(), AppError::OutputExists(PathBuf::new()).exit_code());
    }
}
