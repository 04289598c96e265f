use chrono::{DateTime, Utc};
use tracing::{debug, info};
use url::Url;

use crate::error::{ReportError, Result};
use crate::github::types::Release;
use crate::github::GitHubClient;

/// One release, flattened for the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRow {
    pub published_at: DateTime<Utc>,
    pub author_login: String,
    pub tag_name: String,
    pub repository_name: String,
    pub release_name: String,
    pub html_url: String,
}

/// Fetches releases of every repository, one request at a time, in the
/// order the repositories were listed.
pub async fn collect_releases(client: &GitHubClient, repos: &[String]) -> Result<Vec<ReleaseRow>> {
    info!("Getting releases in the {} organization...", client.org());

    let mut rows = Vec::new();
    for repo in repos {
        let releases = client.list_releases(repo).await?;
        debug!(repo = %repo, count = releases.len(), "fetched releases");

        for release in releases {
            if let Some(row) = row_from_release(release, repo)? {
                rows.push(row);
            }
        }
    }

    info!("Collected {} releases from {} repositories", rows.len(), repos.len());
    Ok(rows)
}

/// `Ok(None)` for unpublished drafts, which no date window can match.
pub fn row_from_release(release: Release, repo: &str) -> Result<Option<ReleaseRow>> {
    let author = release.author.ok_or_else(|| ReportError::MissingAuthor {
        repository: repo.to_string(),
        tag: release.tag_name.clone(),
    })?;

    let Some(published_at) = release.published_at else {
        debug!(repo, tag = %release.tag_name, "skipping unpublished release");
        return Ok(None);
    };

    Ok(Some(ReleaseRow {
        published_at,
        author_login: author.login,
        repository_name: repository_from_url(&release.url)?,
        tag_name: release.tag_name,
        release_name: release.name.unwrap_or_default(),
        html_url: release.html_url,
    }))
}

/// Repository name from an API release URL of the shape
/// `{base}/repos/{owner}/{repo}/releases/{id}`. The base may carry its own
/// path prefix (`/api/v3` on GitHub Enterprise). The owner is not compared
/// with the requested organization: a renamed org reports its new name.
pub fn repository_from_url(release_url: &str) -> Result<String> {
    let unexpected = || ReportError::UnexpectedReleaseUrl(release_url.to_string());

    let url = Url::parse(release_url).map_err(|_| unexpected())?;
    let segments: Vec<&str> = url.path_segments().ok_or_else(unexpected)?.collect();

    segments
        .windows(3)
        .find(|w| w[0] == "repos" && !w[1].is_empty() && !w[2].is_empty())
        .map(|w| w[2].to_string())
        .ok_or_else(unexpected)
}
