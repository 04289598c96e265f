use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entry of `GET /orgs/{org}/repos`. Only the fields the report needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
}

/// Entry of `GET /repos/{org}/{repo}/releases`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub url: String,
    pub html_url: String,
    pub tag_name: String,
    pub name: Option<String>,
    /// `null` for releases whose author account was deleted.
    pub author: Option<ReleaseAuthor>,
    /// `null` for unpublished drafts.
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseAuthor {
    pub login: String,
}

/// Query string sent with every listing request.
#[derive(Debug, Clone, Serialize)]
pub struct ListParams {
    pub filter: &'static str,
    pub state: &'static str,
    pub per_page: u8,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            filter: "all",
            state: "all",
            per_page: super::client::PER_PAGE,
        }
    }
}
