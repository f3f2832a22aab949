//! Navitia client error types.

/// Errors from the Navitia HTTP client or its fixture-backed mock.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by Navitia API")]
    RateLimited,

    /// Invalid token or unauthorized
    #[error("unauthorized (check NAVITIA_TOKEN)")]
    Unauthorized,

    /// Mock client has no fixture for this pair
    #[error("no fixture for {from} -> {to}")]
    NoFixture { from: String, to: String },

    /// Fixture directory could not be loaded
    #[error("fixture error: {0}")]
    Fixture(String),
}
