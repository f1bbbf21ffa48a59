//! HTTP client for the archive's scrape search and metadata endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::metadata::MetadataRecord;
use crate::user_agent;

use super::http_client::{HttpTimeouts, build_archive_http_client};
use super::{ArchiveError, ArchiveService};

/// Default archive API base URL.
pub const DEFAULT_ARCHIVE_URL: &str = "https://archive.org";

/// Page size requested from the scrape endpoint (its maximum).
const SCRAPE_PAGE_SIZE: u32 = 10_000;

// ==================== Scrape API Response Types ====================

/// One page of the scrape search response.
#[derive(Debug, Deserialize)]
struct ScrapePage {
    #[serde(default)]
    items: Vec<ScrapeItem>,
    /// Continuation token; absent on the last page.
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeItem {
    identifier: Option<String>,
}

// ==================== ArchiveClient ====================

/// Talks to the archive over HTTP.
///
/// Search uses `{base}/services/search/v1/scrape`, following the `cursor`
/// until every page is read. Metadata uses `{base}/metadata/{identifier}`.
pub struct ArchiveClient {
    client: Client,
    base_url: String,
}

impl ArchiveClient {
    /// Creates a client for the public archive.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] if HTTP client construction fails.
    pub fn new(timeouts: HttpTimeouts) -> Result<Self, ArchiveError> {
        Self::with_base_url(DEFAULT_ARCHIVE_URL, timeouts)
    }

    /// Creates a client against a custom base URL (mirrors, wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] if the base URL is not an absolute http(s) URL
    /// or HTTP client construction fails.
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeouts: HttpTimeouts,
    ) -> Result<Self, ArchiveError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let parsed =
            Url::parse(&base_url).map_err(|e| ArchiveError::invalid_url(&base_url, &e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ArchiveError::invalid_url(&base_url, "scheme must be http or https"));
        }

        let client = build_archive_http_client(&user_agent::default_archive_user_agent(), timeouts)?;
        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn scrape_url(&self, query: &str, cursor: Option<&str>) -> Result<Url, ArchiveError> {
        let raw = format!("{}/services/search/v1/scrape", self.base_url);
        let mut url = Url::parse(&raw).map_err(|e| ArchiveError::invalid_url(&raw, &e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", query)
                .append_pair("fields", "identifier")
                .append_pair("count", &SCRAPE_PAGE_SIZE.to_string());
            if let Some(cursor) = cursor {
                pairs.append_pair("cursor", cursor);
            }
        }
        Ok(url)
    }

    fn metadata_url(&self, identifier: &str) -> String {
        format!(
            "{}/metadata/{}",
            self.base_url,
            urlencoding::encode(identifier)
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ArchiveError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(error = %e, url, "Archive request failed");
            ArchiveError::request(url, &e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), url, "Archive returned error status");
            return Err(ArchiveError::status(url, status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ArchiveError::decode(url, &e.to_string()))
    }
}

impl std::fmt::Debug for ArchiveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ArchiveService for ArchiveClient {
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn search(&self, query: &str) -> Result<Vec<String>, ArchiveError> {
        let mut identifiers = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let url = self.scrape_url(query, cursor.as_deref())?;
            debug!(api_url = %url, "Calling scrape search API");
            let page: ScrapePage = self.get_json(url.as_str()).await?;

            let page_len = page.items.len();
            identifiers.extend(
                page.items
                    .into_iter()
                    .filter_map(|item| item.identifier)
                    .filter(|identifier| !identifier.is_empty()),
            );

            match page.cursor {
                Some(next) if page_len > 0 && cursor.as_deref() != Some(next.as_str()) => {
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        debug!(count = identifiers.len(), "Search complete");
        Ok(identifiers)
    }

    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn metadata(&self, identifier: &str) -> Result<Option<MetadataRecord>, ArchiveError> {
        let url = self.metadata_url(identifier);
        debug!(api_url = %url, "Calling metadata API");
        let body: Value = self.get_json(&url).await?;
        Ok(MetadataRecord::from_response(&body))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ArchiveClient {
        ArchiveClient::with_base_url("https://archive.example/", HttpTimeouts::default()).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client().base_url(), "https://archive.example");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = ArchiveClient::with_base_url("not a url", HttpTimeouts::default()).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidUrl { .. }));

        let err =
            ArchiveClient::with_base_url("ftp://archive.example", HttpTimeouts::default()).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidUrl { .. }));
    }

    #[test]
    fn test_scrape_url_encodes_query() {
        let url = client().scrape_url("creator:(Edward Pusey)", None).unwrap();
        assert_eq!(url.path(), "/services/search/v1/scrape");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".to_string(), "creator:(Edward Pusey)".to_string())));
        assert!(pairs.contains(&("fields".to_string(), "identifier".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "cursor"));
    }

    #[test]
    fn test_scrape_url_includes_cursor() {
        let url = client().scrape_url("q", Some("abc==")).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("cursor".to_string(), "abc==".to_string())));
    }

    #[test]
    fn test_metadata_url_encodes_identifier() {
        assert_eq!(
            client().metadata_url("odd id/1"),
            "https://archive.example/metadata/odd%20id%2F1"
        );
    }

    #[test]
    fn test_scrape_page_parses_without_cursor() {
        let page: ScrapePage =
            serde_json::from_str(r#"{"items":[{"identifier":"a"},{}],"count":2,"total":2}"#).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].identifier.as_deref(), Some("a"));
        assert!(page.cursor.is_none());
    }
}
