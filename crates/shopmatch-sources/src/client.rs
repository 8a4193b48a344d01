//! REST client for the upstream shop source.
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `GET companies` returns a JSON array of company names.
//! - `GET shops?company=<name>` returns a JSON array of raw shop records.
//!
//! Every request is retried on transient failures; a configured token is
//! sent as a bearer `Authorization` header.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use shopmatch_core::{AppConfig, RawGroupedResults, RawShopRecord};

use crate::error::SourceError;
use crate::retry::retry_with_backoff;

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF_BASE_MS: u64 = 1_000;

/// Client for the upstream shop source.
///
/// Use [`SourceClient::from_config`] in the binary, or
/// [`SourceClient::new`] to point at a mock server in tests.
pub struct SourceClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl SourceClient {
    /// Creates a client for the source at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SourceError::InvalidBaseUrl`] if
    /// `base_url` does not parse or cannot be used as a base (e.g. `mailto:`).
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash; endpoint names replace the empty last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| SourceError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(SourceError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            token: None,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        })
    }

    /// Builds a client from [`AppConfig`] source settings.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingSourceUrl`] when no source URL is
    /// configured, plus any error from [`SourceClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        let base_url = config
            .source_url
            .as_deref()
            .ok_or(SourceError::MissingSourceUrl)?;
        let mut client = Self::new(base_url, config.request_timeout_secs, &config.user_agent)?
            .with_retry(config.max_retries, config.retry_backoff_base_ms);
        if let Some(token) = &config.source_token {
            client = client.with_token(token.clone());
        }
        Ok(client)
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Fetches the ordered list of reporting companies.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] on network failure or non-2xx status.
    /// - [`SourceError::Deserialize`] if the body is not a JSON string array.
    pub async fn list_companies(&self) -> Result<Vec<String>, SourceError> {
        let url = self.endpoint_url("companies", &[]);
        self.get_json(&url).await
    }

    /// Fetches the raw shop records one company reports.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] on network failure or non-2xx status.
    /// - [`SourceError::Deserialize`] if the body is not a JSON array of
    ///   objects.
    pub async fn list_shops(&self, company: &str) -> Result<Vec<RawShopRecord>, SourceError> {
        let url = self.endpoint_url("shops", &[("company", company)]);
        self.get_json(&url).await
    }

    /// Fetches every company's shops, keyed in company-list order.
    ///
    /// Companies are fetched one at a time so the mapping order matches the
    /// order the source lists them in.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`SourceClient::list_companies`] or
    /// [`SourceClient::list_shops`].
    pub async fn fetch_grouped(&self) -> Result<RawGroupedResults, SourceError> {
        let companies = self.list_companies().await?;
        let mut grouped = RawGroupedResults::new();

        for company in companies {
            let shops = self.list_shops(&company).await?;
            tracing::debug!(company = %company, shops = shops.len(), "fetched company shops");
            grouped.insert(company, shops);
        }

        tracing::info!(
            companies = grouped.len(),
            records = grouped.record_count(),
            "fetched grouped shop results"
        );
        Ok(grouped)
    }

    fn endpoint_url(&self, path: &str, query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(path);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, SourceError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.get_json_once(url)
        })
        .await
    }

    /// Sends one GET, asserts a 2xx status, and parses the body as JSON.
    async fn get_json_once<T: DeserializeOwned>(&self, url: &Url) -> Result<T, SourceError> {
        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
