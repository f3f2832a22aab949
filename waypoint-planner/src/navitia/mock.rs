//! Mock Navitia client for running without API access.
//!
//! Loads journeys responses from JSON files and serves them as if they
//! were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::RwLock;

use super::error::ProviderError;
use super::types::JourneysResponse;

/// Separator between origin and destination in fixture file names.
const PAIR_SEPARATOR: &str = "--";

/// Status reported for fixtures carrying a non-"no solution" error.
const FIXTURE_ERROR_STATUS: u16 = 400;

type FixtureKey = (String, String);

/// Mock Navitia client that serves data from JSON files.
#[derive(Clone)]
pub struct MockNavitiaClient {
    fixtures: Arc<RwLock<HashMap<FixtureKey, JourneysResponse>>>,
}

impl MockNavitiaClient {
    /// Create a new mock client by loading JSON files from a directory.
    ///
    /// Expects files named `{from}--{to}.json`, where `from` and `to` are
    /// the exact query strings the planner will send.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let fixtures = load_fixtures(data_dir.as_ref())?;
        Ok(Self {
            fixtures: Arc::new(RwLock::new(fixtures)),
        })
    }

    /// Serve the fixture for `from -> to`, keeping at most `count` journeys.
    ///
    /// The departure time is ignored: fixture data is static. A fixture
    /// carrying an `error` object is answered the way the live client
    /// answers it: empty for "no solution", [`ProviderError::Api`] otherwise.
    pub async fn journeys(
        &self,
        from: &str,
        to: &str,
        _departure: NaiveDateTime,
        count: usize,
    ) -> Result<JourneysResponse, ProviderError> {
        let fixtures = self.fixtures.read().await;
        let mut response = fixtures
            .get(&(from.to_string(), to.to_string()))
            .cloned()
            .ok_or_else(|| ProviderError::NoFixture {
                from: from.to_string(),
                to: to.to_string(),
            })?;

        if let Some(error) = &response.error {
            if response.is_no_solution() {
                return Ok(JourneysResponse::default());
            }
            return Err(ProviderError::Api {
                status: FIXTURE_ERROR_STATUS,
                message: error
                    .message
                    .clone()
                    .or_else(|| error.id.clone())
                    .unwrap_or_default(),
            });
        }

        response.journeys.truncate(count.max(1));
        Ok(response)
    }

    /// Number of loaded origin/destination pairs.
    pub async fn len(&self) -> usize {
        self.fixtures.read().await.len()
    }

    /// Returns true if no fixtures are loaded.
    pub async fn is_empty(&self) -> bool {
        self.fixtures.read().await.is_empty()
    }

    /// Reload fixtures from disk.
    pub async fn reload(&self, data_dir: impl AsRef<Path>) -> Result<usize, ProviderError> {
        let fresh = load_fixtures(data_dir.as_ref())?;
        let count = fresh.len();
        *self.fixtures.write().await = fresh;
        Ok(count)
    }
}

fn load_fixtures(data_dir: &Path) -> Result<HashMap<FixtureKey, JourneysResponse>, ProviderError> {
    let entries = std::fs::read_dir(data_dir).map_err(|e| {
        ProviderError::Fixture(format!("failed to read {}: {e}", data_dir.display()))
    })?;

    let mut fixtures = HashMap::new();

    for entry in entries {
        let path = entry
            .map_err(|e| ProviderError::Fixture(format!("failed to read directory entry: {e}")))?
            .path();

        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some((from, to)) = stem.split_once(PAIR_SEPARATOR) else {
            tracing::warn!(path = %path.display(), "skipping fixture without from--to name");
            continue;
        };

        let json = std::fs::read_to_string(&path)
            .map_err(|e| ProviderError::Fixture(format!("failed to read {}: {e}", path.display())))?;
        let response: JourneysResponse =
            serde_json::from_str(&json).map_err(|e| ProviderError::Json {
                message: format!("{}: {e}", path.display()),
                body: None,
            })?;

        fixtures.insert((from.to_string(), to.to_string()), response);
    }

    if fixtures.is_empty() {
        return Err(ProviderError::Fixture(format!(
            "no fixture files found in {}",
            data_dir.display()
        )));
    }

    Ok(fixtures)
}
