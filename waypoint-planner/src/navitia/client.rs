//! Navitia journeys HTTP client.
//!
//! Provides an async method for querying the `/journeys` endpoint.
//! Handles authentication and bounds the number of concurrent requests.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDateTime;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tokio::sync::Semaphore;
use tracing::debug;

use super::error::ProviderError;
use super::types::{JourneysResponse, format_datetime};

/// Default base URL for the Navitia API.
const DEFAULT_BASE_URL: &str = "https://api.navitia.io/v1";

/// Default coverage region (Île-de-France).
const DEFAULT_COVERAGE: &str = "fr-idf";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the Navitia client.
#[derive(Debug, Clone)]
pub struct NavitiaConfig {
    /// API token, sent as the Basic auth user name
    pub token: String,
    /// Base URL for the API
    pub base_url: String,
    /// Coverage region
    pub coverage: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NavitiaConfig {
    /// Create a new config with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            coverage: DEFAULT_COVERAGE.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the coverage region.
    pub fn with_coverage(mut self, coverage: impl Into<String>) -> Self {
        self.coverage = coverage.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Build the Basic auth header value: the token is the user, password empty.
fn basic_auth(token: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{token}:")))
}

/// Navitia API client.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct NavitiaClient {
    http: reqwest::Client,
    journeys_url: String,
    semaphore: Arc<Semaphore>,
}

impl NavitiaClient {
    /// Create a new Navitia client with the given configuration.
    pub fn new(config: NavitiaConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();

        let auth =
            HeaderValue::from_str(&basic_auth(&config.token)).map_err(|_| ProviderError::Api {
                status: 0,
                message: "Invalid token format".to_string(),
            })?;
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            journeys_url: format!(
                "{}/coverage/{}/journeys",
                config.base_url.trim_end_matches('/'),
                config.coverage
            ),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Request up to `count` itineraries from `from` to `to`, departing at `departure`.
    ///
    /// A "no solution" answer is returned as an empty response, not an error.
    pub async fn journeys(
        &self,
        from: &str,
        to: &str,
        departure: NaiveDateTime,
        count: usize,
    ) -> Result<JourneysResponse, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        debug!(%from, %to, %departure, count, "requesting journeys");

        let response = self
            .http
            .get(&self.journeys_url)
            .query(&[
                ("from", from.to_string()),
                ("to", to.to_string()),
                ("datetime", format_datetime(&departure)),
                ("datetime_represents", "departure".to_string()),
                ("count", count.max(1).to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        let body = response.text().await?;

        if !status.is_success() {
            // Navitia answers 404 with an error object when there is no route.
            if let Ok(parsed) = serde_json::from_str::<JourneysResponse>(&body) {
                if parsed.is_no_solution() {
                    return Ok(JourneysResponse::default());
                }
            }
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let parsed: JourneysResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        if parsed.is_no_solution() {
            return Ok(JourneysResponse::default());
        }

        Ok(parsed)
    }
}
