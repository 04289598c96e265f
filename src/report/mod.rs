pub mod collector;
pub mod writer;

pub use collector::collect_releases;
pub use writer::{ReportFiles, ReportWriter};

use tracing::info;

use crate::config::ReportRequest;
use crate::error::Result;
use crate::github::GitHubClient;

/// Enumerate repositories, collect their releases, write the report.
/// Nothing is written unless every request and every release succeeded.
pub async fn run(request: &ReportRequest) -> Result<ReportFiles> {
    let client = GitHubClient::new(
        &request.api_url,
        request.credentials.user.clone(),
        request.credentials.token.clone(),
        request.organization.clone(),
    )
    .await?;

    info!("Getting repositories in the {} organization...", request.organization);
    let repos = client.list_repositories().await?;
    info!("Found {} repositories", repos.len());

    let rows = collect_releases(&client, &repos).await?;

    ReportWriter::new(request.output_dir.clone(), request.range).write(rows)
}
