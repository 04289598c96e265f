use http::header::ACCEPT;
use octocrab::Octocrab;
use tracing::{debug, warn};

use super::types::{ListParams, Release, Repository};
use crate::error::Result;

/// Page size for every listing call. Only the first page is ever read.
pub const PER_PAGE: u8 = 100;

const ACCEPT_V3_JSON: &str = "application/vnd.github.v3+json";

pub struct GitHubClient {
    client: Octocrab,
    org: String,
}

impl GitHubClient {
    /// `api_url` may carry a path prefix (`/api/v3` on GitHub Enterprise);
    /// octocrab puts it in front of every route.
    pub async fn new(api_url: &str, user: String, token: String, org: String) -> Result<Self> {
        let client = Octocrab::builder()
            .base_uri(api_url)?
            .basic_auth(user, token)
            .add_header(ACCEPT, ACCEPT_V3_JSON.to_string())
            .build()?;
        Ok(Self { client, org })
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    /// Names of the organization's repositories, first page only.
    pub async fn list_repositories(&self) -> Result<Vec<String>> {
        let route = format!("/orgs/{}/repos", self.org);
        debug!(%route, "listing repositories");

        let repos: Vec<Repository> = self
            .client
            .get(&route, Some(&ListParams::default()))
            .await?;

        if repos.len() >= PER_PAGE as usize {
            warn!(
                org = %self.org,
                "organization returned a full page of {} repositories; later pages are not fetched",
                PER_PAGE
            );
        }

        Ok(repos.into_iter().map(|r| r.name).collect())
    }

    /// Releases of one repository, first page only.
    pub async fn list_releases(&self, repo: &str) -> Result<Vec<Release>> {
        let route = format!("/repos/{}/{}/releases", self.org, repo);
        debug!(%route, "listing releases");

        let releases: Vec<Release> = self
            .client
            .get(&route, Some(&ListParams::default()))
            .await?;

        if releases.len() >= PER_PAGE as usize {
            warn!(
                repo,
                "repository returned a full page of {} releases; later pages are not fetched",
                PER_PAGE
            );
        }

        Ok(releases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use pretty_assertions::assert_eq;

    // base64("octocat:secret")
    const BASIC_AUTH: &str = "Basic b2N0b2NhdDpzZWNyZXQ=";

    fn list_query() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("filter".into(), "all".into()),
            Matcher::UrlEncoded("state".into(), "all".into()),
            Matcher::UrlEncoded("per_page".into(), "100".into()),
        ])
    }

    async fn client_for(server: &ServerGuard) -> GitHubClient {
        client_at(&server.url()).await
    }

    async fn client_at(api_url: &str) -> GitHubClient {
        GitHubClient::new(
            api_url,
            "octocat".to_string(),
            "secret".to_string(),
            "acme".to_string(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn lists_repository_names_with_basic_auth() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/orgs/acme/repos")
            .match_query(list_query())
            .match_header("authorization", BASIC_AUTH)
            .match_header("accept", Matcher::Regex("application/vnd\\.github\\.v3\\+json".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"name": "api", "id": 1}, {"name": "web", "id": 2}]"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let repos = client.list_repositories().await.unwrap();

        assert_eq!(repos, vec!["api".to_string(), "web".to_string()]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn enterprise_base_path_prefixes_every_route() {
        let mut server = Server::new_async().await;
        let repos = server
            .mock("GET", "/api/v3/orgs/acme/repos")
            .match_query(list_query())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"name": "api"}]"#)
            .create_async()
            .await;
        let releases = server
            .mock("GET", "/api/v3/repos/acme/api/releases")
            .match_query(list_query())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = client_at(&format!("{}/api/v3", server.url())).await;

        assert_eq!(client.list_repositories().await.unwrap(), vec!["api".to_string()]);
        assert!(client.list_releases("api").await.unwrap().is_empty());
        repos.assert_async().await;
        releases.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/orgs/acme/repos")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Not Found", "documentation_url": "https://docs.github.com"}"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        assert!(client.list_repositories().await.is_err());
    }

    #[tokio::test]
    async fn lists_releases_of_a_repository() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/acme/api/releases")
            .match_query(list_query())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{
                    "url": "https://api.github.com/repos/acme/api/releases/7",
                    "html_url": "https://github.com/acme/api/releases/tag/v1.0.0",
                    "tag_name": "v1.0.0",
                    "name": null,
                    "author": {"login": "octocat", "id": 1},
                    "published_at": "2023-01-15T10:30:00Z"
                }]"#,
            )
            .create_async()
            .await;

        let client = client_for(&server).await;
        let releases = client.list_releases("api").await.unwrap();

        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].tag_name, "v1.0.0");
        assert_eq!(releases[0].name, None);
        assert_eq!(releases[0].author.as_ref().unwrap().login, "octocat");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn release_without_author_field_deserializes_as_none() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/acme/api/releases")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{
                    "url": "https://api.github.com/repos/acme/api/releases/7",
                    "html_url": "https://github.com/acme/api/releases/tag/v1.0.0",
                    "tag_name": "v1.0.0",
                    "name": "First",
                    "published_at": "2023-01-15T10:30:00Z"
                }]"#,
            )
            .create_async()
            .await;

        let client = client_for(&server).await;
        let releases = client.list_releases("api").await.unwrap();

        assert!(releases[0].author.is_none());
    }
}
