use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::catalog::ApplicationRecord;
use crate::config::{parse_feed_url, Config};
use crate::error::{Result, UdbError};

const USER_AGENT: &str = concat!("udb-api/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the upstream catalog feed
#[derive(Debug, Clone)]
pub struct UpstreamFeed {
    client: Client,
    url: Url,
}

impl UpstreamFeed {
    /// Create a client for `url` with a per-request timeout
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        Self::with_url(parse_feed_url(url)?, timeout)
    }

    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_url(config.upstream_url()?, config.fetch_timeout()?)
    }

    fn with_url(url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Download and parse the full catalog
    pub async fn fetch_records(&self) -> Result<Vec<ApplicationRecord>> {
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UdbError::upstream(status.as_u16(), message));
        }

        let body = response.text().await?;
        parse_catalog(&body)
    }
}

/// Parse a feed payload into records
///
/// Anything other than a JSON array of objects with a string `title` is
/// rejected as a whole; a partially valid feed is never published.
pub fn parse_catalog(body: &str) -> Result<Vec<ApplicationRecord>> {
    serde_json::from_str(body).map_err(|e| UdbError::MalformedUpstream(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"[
        {"title": "Universal-Updater", "systems": ["3DS"], "author": "Universal-Team"},
        {"title": "TWiLight Menu++", "systems": ["DS", "3DS"], "version": "v27.0.0"}
    ]"#;

    // ─────────────────────────────────────────────────────────────────────────
    // Payload Parsing Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_catalog_keeps_order() {
        let records = parse_catalog(FEED).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Universal-Updater");
        assert_eq!(records[1].version(), Some("v27.0.0"));
    }

    #[test]
    fn test_parse_catalog_rejects_object() {
        let err = parse_catalog(r#"{"title": "lonely"}"#).unwrap_err();
        assert!(matches!(err, UdbError::MalformedUpstream(_)));
    }

    #[test]
    fn test_parse_catalog_rejects_record_without_title() {
        let err = parse_catalog(r#"[{"systems": ["DS"]}]"#).unwrap_err();
        assert!(matches!(err, UdbError::MalformedUpstream(_)));
    }

    #[test]
    fn test_new_rejects_non_http_url() {
        let err = UpstreamFeed::new("file:///tmp/full.json", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, UdbError::InvalidArgument(_)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // HTTP Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_fetch_records_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/data/full.json")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(FEED)
            .create_async()
            .await;

        let feed = UpstreamFeed::new(
            &format!("{}/data/full.json", server.url()),
            Duration::from_secs(5),
        )
        .unwrap();
        let records = feed.fetch_records().await.unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_records_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/data/full.json")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let feed = UpstreamFeed::new(
            &format!("{}/data/full.json", server.url()),
            Duration::from_secs(5),
        )
        .unwrap();
        let err = feed.fetch_records().await.unwrap_err();

        match err {
            UdbError::Upstream { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_records_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/data/full.json")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let feed = UpstreamFeed::new(
            &format!("{}/data/full.json", server.url()),
            Duration::from_secs(5),
        )
        .unwrap();

        assert!(matches!(
            feed.fetch_records().await,
            Err(UdbError::MalformedUpstream(_))
        ));
    }
}
