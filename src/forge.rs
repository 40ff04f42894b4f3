//! Upstream forge API client.
//!
//! Translates the two logical queries this service needs, listing a user's
//! repositories and listing a repository's branches, into HTTP GETs against
//! the configured API base URL and decodes the JSON responses.
//!
//! No retries, no pagination: a user or repository with more results than the
//! upstream default page size yields only that first page.

pub mod api_types;

use anyhow::Context;
use reqwest::{header, StatusCode, Url};
use tracing::debug;

use crate::forge::api_types::{UpstreamBranch, UpstreamRepo};

/// Accept header sent on every upstream API request.
const ACCEPT: &str = "application/vnd.github.v3+json";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Failure modes of a single upstream query.
///
/// Callers match on the variant; only [`ForgeError::NotFound`] has a
/// dedicated inbound mapping, everything else is an upstream failure.
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// Upstream answered 404 for the requested resource.
    #[error("upstream returned 404 for {url}")]
    NotFound { url: Url },
    /// Upstream answered with a non-2xx status other than 404.
    #[error("upstream returned {status} for {url}")]
    Status { status: StatusCode, url: Url },
    /// The request never produced a response (connect, TLS, timeout).
    #[error("upstream request failed")]
    Transport(#[source] reqwest::Error),
    /// Upstream answered 2xx but the body did not match the expected shape.
    #[error("failed to decode upstream response from {url}")]
    Decode {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Read-only client for the upstream forge API.
///
/// Cheap to clone; the inner reqwest client is pooled and shared.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl UpstreamClient {
    /// Build a client for the API rooted at `api_url`.
    pub fn new(http_client: reqwest::Client, api_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(api_url)
            .with_context(|| format!("invalid upstream api_url: {api_url}"))?;
        anyhow::ensure!(
            !base_url.cannot_be_a_base(),
            "upstream api_url must be an absolute http(s) URL: {api_url}"
        );
        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// `GET {base}/users/{username}/repos`
    ///
    /// Returns the repository listing exactly as upstream ordered it; no
    /// filtering happens here.
    pub async fn list_user_repos(&self, username: &str) -> Result<Vec<UpstreamRepo>, ForgeError> {
        self.get_json(&["users", username, "repos"]).await
    }

    /// `GET {base}/repos/{owner}/{repo}/branches`
    pub async fn list_repo_branches(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<UpstreamBranch>, ForgeError> {
        self.get_json(&["repos", owner, repo, "branches"]).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, ForgeError> {
        let url = self.endpoint(segments);
        debug!(%url, "querying upstream");

        let resp = self
            .http_client
            .get(url.clone())
            .header(header::ACCEPT, ACCEPT)
            .send()
            .await
            .map_err(ForgeError::Transport)?;

        match resp.status() {
            status if status.is_success() => resp
                .json::<T>()
                .await
                .map_err(|source| ForgeError::Decode { url, source }),
            StatusCode::NOT_FOUND => Err(ForgeError::NotFound { url }),
            status => Err(ForgeError::Status { status, url }),
        }
    }

    /// Join path segments onto the base URL.
    ///
    /// `extend` percent-encodes each segment, so reserved characters in a
    /// username or repository name cannot break out of their path position.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .expect("base URL validated in UpstreamClient::new");
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> UpstreamClient {
        UpstreamClient::new(reqwest::Client::new(), api_url).unwrap()
    }

    // ── URL construction ────────────────────────────────────────────────

    #[test]
    fn endpoint_joins_segments() {
        let url = client("https://api.example.com").endpoint(&["users", "alice", "repos"]);
        assert_eq!(url.as_str(), "https://api.example.com/users/alice/repos");
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        // GitHub Enterprise roots its API under /api/v3.
        let url = client("https://ghe.corp.example.com/api/v3")
            .endpoint(&["repos", "acme", "widgets", "branches"]);
        assert_eq!(
            url.as_str(),
            "https://ghe.corp.example.com/api/v3/repos/acme/widgets/branches"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash_on_base() {
        let url = client("https://api.example.com/").endpoint(&["users", "alice", "repos"]);
        assert_eq!(url.as_str(), "https://api.example.com/users/alice/repos");
    }

    #[test]
    fn endpoint_percent_encodes_reserved_characters() {
        let url = client("https://api.example.com").endpoint(&["users", "a/b c", "repos"]);
        assert_eq!(url.as_str(), "https://api.example.com/users/a%2Fb%20c/repos");
    }

    // ── Construction ────────────────────────────────────────────────────

    #[test]
    fn new_rejects_relative_url() {
        assert!(UpstreamClient::new(reqwest::Client::new(), "not a url").is_err());
    }

    #[test]
    fn new_rejects_non_base_url() {
        assert!(UpstreamClient::new(reqwest::Client::new(), "mailto:me@example.com").is_err());
    }
}
