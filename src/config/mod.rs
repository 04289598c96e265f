pub mod types;

pub use types::{Credentials, DateRange, ReportRequest, Verbosity, DEFAULT_API_URL};
