//! [`GithubClient`]: the [`HostingApi`] implementation over GitHub REST v3.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use report::{
    CommitDetail, CommitListing, CommitQuery, CommitSha, HostingApi, HostingError, Organization,
    Page, RemoteCommit, RepositoryName, RepositoryRef, Timestamp,
};

use crate::wire::{CommitDetailEntry, CommitEntry, ErrorBody, RepositoryEntry};

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest page GitHub serves; only one page is ever requested.
const PER_PAGE: &str = "100";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("weekly-report/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Connection settings for [`GithubClient`].
#[derive(Clone)]
pub struct GithubClientConfig {
    /// API root, without trailing slash (e.g. `https://api.github.com`).
    pub base_url: String,
    /// Personal access or installation token.
    pub token: String,
    pub timeout: Duration,
}

impl GithubClientConfig {
    /// Settings for the public GitHub API with the default timeout.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for GithubClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Errors raised while constructing a [`GithubClient`].
#[derive(Debug, Error)]
pub enum GithubClientError {
    /// The token contains characters that cannot appear in an HTTP header.
    #[error("auth token is not a valid HTTP header value")]
    InvalidToken,

    #[error("could not build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// GitHub REST client implementing [`HostingApi`].
///
/// Cheap to share by reference across concurrent pipeline branches; the
/// underlying `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    base_url: String,
}

impl GithubClient {
    pub fn new(config: GithubClientConfig) -> Result<Self, GithubClientError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| GithubClientError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response, HostingError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        self.http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|err| HostingError::Transport(err.to_string()))
    }
}

#[async_trait]
impl HostingApi for GithubClient {
    #[instrument(skip_all, fields(org = %org))]
    async fn list_repositories(
        &self,
        org: &Organization,
    ) -> Result<Page<RepositoryRef>, HostingError> {
        let path = format!("/orgs/{org}/repos");
        let response = self.get(&path, &[("per_page", PER_PAGE.into())]).await?;
        let response = ensure_success(response).await?;
        let truncated = has_next_page(response.headers());

        let entries: Vec<RepositoryEntry> = decode(response).await?;
        let items = entries
            .into_iter()
            .map(RepositoryRef::try_from)
            .collect::<Result<_, _>>()?;
        Ok(Page { items, truncated })
    }

    #[instrument(skip_all, fields(repo = %query.repo))]
    async fn list_commits(&self, query: &CommitQuery) -> Result<CommitListing, HostingError> {
        let path = format!("/repos/{}/{}/commits", query.owner, query.repo);
        let params = [
            ("author", query.author.to_string()),
            ("since", format_instant(query.window.start().as_datetime())),
            ("until", format_instant(last_second(query.window.end()))),
            ("per_page", PER_PAGE.into()),
        ];
        let response = self.get(&path, &params).await?;

        // GitHub answers 409 Conflict for a repository with no commits.
        if response.status() == StatusCode::CONFLICT {
            debug!("repository is empty");
            return Ok(CommitListing::Empty);
        }

        let response = ensure_success(response).await?;
        let truncated = has_next_page(response.headers());

        let entries: Vec<CommitEntry> = decode(response).await?;
        let items = entries
            .into_iter()
            .map(RemoteCommit::try_from)
            .collect::<Result<_, _>>()?;
        Ok(CommitListing::Commits(Page { items, truncated }))
    }

    #[instrument(skip_all, fields(repo = %repo, sha = %sha))]
    async fn get_commit(
        &self,
        owner: &Organization,
        repo: &RepositoryName,
        sha: &CommitSha,
    ) -> Result<CommitDetail, HostingError> {
        let path = format!("/repos/{owner}/{repo}/commits/{sha}");
        let response = ensure_success(self.get(&path, &[]).await?).await?;

        let entry: CommitDetailEntry = decode(response).await?;
        CommitDetail::try_from(entry)
    }
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

/// GitHub's `until` is inclusive and its timestamps have second precision, so
/// the last second of the window makes the query half-open.
fn last_second(end: Timestamp) -> DateTime<Utc> {
    end.as_datetime() - TimeDelta::seconds(1)
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn has_next_page(headers: &HeaderMap) -> bool {
    headers
        .get(LINK)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|link| link.contains("rel=\"next\""))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, HostingError> {
    response
        .json::<T>()
        .await
        .map_err(|err| HostingError::Decode(err.to_string()))
}

async fn ensure_success(response: Response) -> Result<Response, HostingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let headers = response.headers().clone();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
    };
    Err(classify(status, &headers, message))
}

fn classify(status: StatusCode, headers: &HeaderMap, message: String) -> HostingError {
    let exhausted = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        == Some("0");
    let reset_at = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(Timestamp::from_utc);

    match status {
        StatusCode::TOO_MANY_REQUESTS => HostingError::RateLimited { reset_at },
        StatusCode::FORBIDDEN if exhausted || message.contains("rate limit") => {
            HostingError::RateLimited { reset_at }
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => HostingError::Unauthorized {
            status: status.as_u16(),
        },
        _ => HostingError::Status {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use report::{AuthorLogin, CommitStats, TimeWindow};

    fn client(server: &MockServer) -> GithubClient {
        GithubClient::new(GithubClientConfig {
            base_url: server.base_url(),
            token: "t0ken".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn org() -> Organization {
        Organization::new("acme").unwrap()
    }

    fn query(repo: &str) -> CommitQuery {
        CommitQuery {
            owner: org(),
            repo: RepositoryName::new(repo).unwrap(),
            author: AuthorLogin::new("alice").unwrap(),
            window: TimeWindow::new(
                Timestamp::from_utc(Utc.with_ymd_and_hms(2026, 10, 11, 0, 0, 0).unwrap()),
                Timestamp::from_utc(Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap()),
            )
            .unwrap(),
        }
    }

    fn commit_json(sha: &str) -> serde_json::Value {
        json!({
            "sha": sha,
            "url": format!("https://api.github.com/repos/acme/a/commits/{sha}"),
            "commit": {
                "message": "Fix parser\n\nDetails.",
                "author": { "name": "Alice A.", "email": "alice@example.com", "date": "2026-10-12T08:00:00Z" },
                "committer": { "name": "Alice", "email": "alice@example.com", "date": "2026-10-12T09:00:00Z" }
            }
        })
    }

    #[tokio::test]
    async fn repositories_are_listed_with_auth_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/orgs/acme/repos")
                    .query_param("per_page", "100")
                    .header("authorization", "Bearer t0ken")
                    .header("accept", "application/vnd.github+json")
                    .header("x-github-api-version", API_VERSION);
                then.status(200)
                    .json_body(json!([{ "name": "a", "private": false }, { "name": "b" }]));
            })
            .await;

        let page = client(&server).list_repositories(&org()).await.unwrap();

        mock.assert_async().await;
        let names: Vec<_> = page.items.iter().map(|r| r.name.to_string()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(!page.truncated);
    }

    #[tokio::test]
    async fn next_link_marks_the_page_truncated() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/orgs/acme/repos");
                then.status(200)
                    .header(
                        "link",
                        r#"<https://api.github.com/organizations/1/repos?page=2>; rel="next", <https://api.github.com/organizations/1/repos?page=3>; rel="last""#,
                    )
                    .json_body(json!([{ "name": "a" }]));
            })
            .await;

        let page = client(&server).list_repositories(&org()).await.unwrap();

        assert!(page.truncated);
    }

    #[tokio::test]
    async fn commits_are_queried_for_the_half_open_window() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/repos/acme/a/commits")
                    .query_param("author", "alice")
                    .query_param("since", "2026-10-11T00:00:00Z")
                    .query_param("until", "2026-10-17T23:59:59Z")
                    .query_param("per_page", "100");
                then.status(200).json_body(json!([commit_json("abc123")]));
            })
            .await;

        let listing = client(&server).list_commits(&query("a")).await.unwrap();

        mock.assert_async().await;
        let CommitListing::Commits(page) = listing else {
            panic!("expected commits, got {listing:?}");
        };
        assert_eq!(page.items.len(), 1);
        let commit = &page.items[0];
        assert_eq!(commit.sha.as_str(), "abc123");
        assert_eq!(commit.name, "Alice");
        assert_eq!(
            commit.date,
            Timestamp::from_utc(Utc.with_ymd_and_hms(2026, 10, 12, 9, 0, 0).unwrap())
        );
        assert_eq!(commit.message, "Fix parser\n\nDetails.");
        assert_eq!(commit.url, "https://api.github.com/repos/acme/a/commits/abc123");
    }

    #[tokio::test]
    async fn author_signature_is_used_when_committer_is_missing() {
        let server = MockServer::start_async().await;
        let mut entry = commit_json("abc123");
        entry["commit"]["committer"] = serde_json::Value::Null;
        let body = json!([entry]);
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/a/commits");
                then.status(200).json_body(body.clone());
            })
            .await;

        let listing = client(&server).list_commits(&query("a")).await.unwrap();

        let CommitListing::Commits(page) = listing else {
            panic!("expected commits");
        };
        assert_eq!(page.items[0].name, "Alice A.");
    }

    #[tokio::test]
    async fn conflict_means_empty_repository() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/empty/commits");
                then.status(409)
                    .json_body(json!({ "message": "Git Repository is empty." }));
            })
            .await;

        let listing = client(&server).list_commits(&query("empty")).await.unwrap();

        assert_eq!(listing, CommitListing::Empty);
    }

    #[tokio::test]
    async fn not_found_carries_status_and_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/gone/commits");
                then.status(404).json_body(json!({ "message": "Not Found" }));
            })
            .await;

        let err = client(&server).list_commits(&query("gone")).await.unwrap_err();

        assert_eq!(
            err,
            HostingError::Status {
                status: 404,
                message: "Not Found".into()
            }
        );
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/orgs/acme/repos");
                then.status(401).json_body(json!({ "message": "Bad credentials" }));
            })
            .await;

        let err = client(&server).list_repositories(&org()).await.unwrap_err();

        assert_eq!(err, HostingError::Unauthorized { status: 401 });
        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn exhausted_quota_is_rate_limited() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/a/commits/abc123");
                then.status(403)
                    .header("x-ratelimit-remaining", "0")
                    .header("x-ratelimit-reset", "1791000000")
                    .json_body(json!({ "message": "API rate limit exceeded" }));
            })
            .await;

        let err = client(&server)
            .get_commit(
                &org(),
                &RepositoryName::new("a").unwrap(),
                &CommitSha::new("abc123").unwrap(),
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            HostingError::RateLimited {
                reset_at: DateTime::from_timestamp(1_791_000_000, 0).map(Timestamp::from_utc)
            }
        );
    }

    #[tokio::test]
    async fn commit_detail_carries_stats() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/repos/acme/a/commits/abc123");
                then.status(200).json_body(json!({
                    "sha": "abc123",
                    "stats": { "additions": 3, "deletions": 1, "total": 4 },
                    "files": []
                }));
            })
            .await;

        let detail = client(&server)
            .get_commit(
                &org(),
                &RepositoryName::new("a").unwrap(),
                &CommitSha::new("abc123").unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(detail.sha.as_str(), "abc123");
        assert_eq!(
            detail.stats,
            CommitStats {
                additions: 3,
                deletions: 1,
                total: 4
            }
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/orgs/acme/repos");
                then.status(200).json_body(json!({ "unexpected": true }));
            })
            .await;

        let err = client(&server).list_repositories(&org()).await.unwrap_err();

        assert!(matches!(err, HostingError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let client = GithubClient::new(GithubClientConfig {
            base_url: "http://127.0.0.1:9".into(),
            token: "t0ken".into(),
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        let err = client.list_repositories(&org()).await.unwrap_err();

        assert!(matches!(err, HostingError::Transport(_)));
    }

    #[test]
    fn tokens_with_newlines_are_rejected() {
        let result = GithubClient::new(GithubClientConfig::new("bad\ntoken"));
        assert!(matches!(result, Err(GithubClientError::InvalidToken)));
    }

    #[test]
    fn debug_output_redacts_the_token() {
        let config = GithubClientConfig::new("s3cret");
        assert!(!format!("{config:?}").contains("s3cret"));
    }
}
