use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::path::PathBuf;
use url::Url;

use crate::error::{ReportError, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Log level selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Verbose,
    Debug,
}

impl Verbosity {
    /// `--debug` wins over `--verbose` when both are given.
    pub fn from_flags(verbose: bool, debug: bool) -> Self {
        if debug {
            Verbosity::Debug
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Quiet
        }
    }

    pub fn filter_directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Verbose => "info",
            Verbosity::Debug => "debug",
        }
    }
}

/// Basic auth pair. The token never shows up in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Publish-date window. Both bounds are exclusive and sit at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end <= start {
            return Err(ReportError::InvalidRequest(format!(
                "end date {} must be after start date {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start.and_time(NaiveTime::MIN) < at && at < self.end.and_time(NaiveTime::MIN)
    }

    /// `releases_<start>_<end>`, shared by both output files.
    pub fn file_stem(&self) -> String {
        format!(
            "releases_{}_{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub organization: String,
    pub credentials: Credentials,
    pub api_url: String,
    pub range: DateRange,
    pub verbosity: Verbosity,
    pub output_dir: PathBuf,
}

impl ReportRequest {
    pub fn new(
        organization: String,
        credentials: Credentials,
        api_url: &str,
        range: DateRange,
        verbosity: Verbosity,
        output_dir: Option<PathBuf>,
    ) -> Result<Self> {
        if organization.trim().is_empty() {
            return Err(ReportError::InvalidRequest(
                "organization must not be empty".to_string(),
            ));
        }
        if credentials.user.is_empty() || credentials.token.is_empty() {
            return Err(ReportError::InvalidRequest(
                "user and token must not be empty".to_string(),
            ));
        }

        let parsed = Url::parse(api_url)
            .map_err(|e| ReportError::InvalidRequest(format!("API URL {}: {}", api_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ReportError::InvalidRequest(format!(
                "API URL {} must use http or https",
                api_url
            )));
        }

        let output_dir = match output_dir {
            Some(dir) => dir,
            None => executable_dir()?,
        };

        Ok(Self {
            organization,
            credentials,
            api_url: api_url.trim_end_matches('/').to_string(),
            range,
            verbosity,
            output_dir,
        })
    }
}

fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(PathBuf::from).ok_or_else(|| {
        ReportError::InvalidRequest(format!("{} has no parent directory", exe.display()))
    })
}
