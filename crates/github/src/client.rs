//! GitHub GraphQL client.
//!
//! One [`GitHubBoardClient::fetch_page`] call is one HTTP POST. Failures are
//! classified into [`BoardError`] here and never retried.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use board::{ApiKey, BoardError, PageRequest, ProjectBoardSource, ProjectPage};
use reqwest::{header, Client};
use tracing::{debug, warn};

use crate::query::{project_page_query, GraphQlPayload, PageVariables};
use crate::wire::interpret_page;

/// Public GitHub GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

/// Media type that enables the classic Projects API preview.
pub const PROJECTS_PREVIEW_ACCEPT: &str = "application/vnd.github.starfox-preview+json";

/// GitHub client configuration.
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,

    /// Token sent as a bearer credential.
    pub api_key: ApiKey,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Value of the `User-Agent` header GitHub requires.
    pub user_agent: String,
}

impl GitHubClientConfig {
    /// Config for the public endpoint with default timeout and user agent.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
            timeout_secs: 30,
            user_agent: concat!("board-tables/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Project board transport over GitHub's GraphQL API.
#[derive(Debug, Clone)]
pub struct GitHubBoardClient {
    client: Client,
    endpoint: String,
    query: String,
}

impl GitHubBoardClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Configuration`] when the token or user agent cannot
    /// be sent as a header, or the HTTP client cannot be built.
    pub fn new(config: GitHubClientConfig) -> Result<Self, BoardError> {
        let mut headers = header::HeaderMap::new();

        let mut auth = header::HeaderValue::from_str(&format!("bearer {}", config.api_key.expose()))
            .map_err(|_| BoardError::configuration("API key contains invalid header characters"))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(PROJECTS_PREVIEW_ACCEPT),
        );

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BoardError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            query: project_page_query(),
        })
    }

    /// POST the query and return the body of a successful response.
    async fn post(&self, request: &PageRequest) -> Result<String, BoardError> {
        let payload = GraphQlPayload {
            query: &self.query,
            variables: PageVariables::from(request),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| BoardError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BoardError::network(format!("Failed to read response body: {e}")))?;

        if status.is_success() {
            Ok(body)
        } else {
            warn!(status = status.as_u16(), "GraphQL request rejected");
            Err(BoardError::http_status(status.as_u16(), body))
        }
    }
}

#[async_trait]
impl ProjectBoardSource for GitHubBoardClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<ProjectPage, BoardError> {
        let started = Instant::now();
        let body = self.post(request).await?;
        let page = interpret_page(&body, request)?;

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = body.len(),
            column = page.column.as_ref().map(|c| c.name.as_str()),
            cards = page.column.as_ref().map_or(0, |c| c.cards.len()),
            "fetched board page"
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_the_public_endpoint() {
        let config = GitHubClientConfig::new(ApiKey::new("token").unwrap());
        assert_eq!(config.endpoint, "https://api.github.com/graphql");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("board-tables/"));
    }

    #[test]
    fn debug_output_hides_the_token() {
        let config = GitHubClientConfig::new(ApiKey::new("ghp_secret").unwrap());
        assert!(!format!("{config:?}").contains("ghp_secret"));
    }

    #[test]
    fn client_rejects_tokens_that_cannot_be_headers() {
        let config = GitHubClientConfig::new(ApiKey::new("bad\ntoken").unwrap());
        let err = GitHubBoardClient::new(config).unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }
}
