use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),
    #[error("release {tag} in repository {repository} has no author")]
    MissingAuthor { repository: String, tag: String },
    #[error("cannot derive repository name from release URL: {0}")]
    UnexpectedReleaseUrl(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
