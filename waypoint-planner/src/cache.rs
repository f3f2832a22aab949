//! Caching route planner over the Navitia journeys API.
//!
//! Raw journeys responses are cached keyed by the exact query (from, to,
//! departure, count). Assembly runs on every call since the assembled route
//! carries per-traveller data (id, preference flags).

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::assembler::{AssemblyInput, ItineraryAssembler};
use crate::clock::{Clock, SystemClock};
use crate::domain::{Place, Route};
use crate::navitia::{JourneysResponse, MockNavitiaClient, NavitiaClient, ProviderError};
use crate::optimizer::{ItineraryProvider, LegQuery, OptimizeError};

/// Cache key for journeys: (from, to, departure, count).
type JourneysKey = (String, String, NaiveDateTime, usize);

/// Cached journeys response.
type JourneysEntry = Arc<JourneysResponse>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Where journeys come from.
pub enum JourneySource {
    Live(NavitiaClient),
    Mock(MockNavitiaClient),
}

impl JourneySource {
    async fn journeys(
        &self,
        from: &str,
        to: &str,
        departure: NaiveDateTime,
        count: usize,
    ) -> Result<JourneysResponse, ProviderError> {
        match self {
            JourneySource::Live(client) => client.journeys(from, to, departure, count).await,
            JourneySource::Mock(client) => client.journeys(from, to, departure, count).await,
        }
    }
}

/// Route planner with caching.
///
/// Wraps a [`JourneySource`], caches its responses and assembles every
/// returned journey into a [`Route`].
pub struct CachedPlanner {
    source: JourneySource,
    journeys: MokaCache<JourneysKey, JourneysEntry>,
    clock: Arc<dyn Clock>,
    assembler: ItineraryAssembler<Arc<dyn Clock>>,
}

impl CachedPlanner {
    /// Create a new cached planner.
    pub fn new(source: JourneySource, cache_config: &CacheConfig) -> Self {
        let journeys = MokaCache::builder()
            .time_to_live(cache_config.ttl)
            .max_capacity(cache_config.max_capacity)
            .build();

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            source,
            journeys,
            assembler: ItineraryAssembler::new(clock.clone()),
            clock,
        }
    }

    /// Replace the clock used for missing timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(clock);
        self.assembler = ItineraryAssembler::new(clock.clone());
        self.clock = clock;
        self
    }

    /// The clock used for missing timestamps.
    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    /// Get journeys, using cache if available.
    pub async fn journeys(
        &self,
        from: &str,
        to: &str,
        departure: NaiveDateTime,
        count: usize,
    ) -> Result<JourneysEntry, ProviderError> {
        let key = (from.to_string(), to.to_string(), departure, count);

        if let Some(cached) = self.journeys.get(&key).await {
            debug!(%from, %to, "journeys cache hit");
            return Ok(cached);
        }

        let response = Arc::new(self.source.journeys(from, to, departure, count).await?);
        self.journeys.insert(key, response.clone()).await;

        Ok(response)
    }

    /// Plan and assemble routes for one query.
    pub async fn plan(&self, query: &LegQuery<'_>) -> Result<Vec<Route>, OptimizeError> {
        let response = self
            .journeys(query.from, query.to, query.departure, query.max_itineraries)
            .await
            .map_err(|e| OptimizeError::Planning {
                from: query.from.to_string(),
                to: query.to.to_string(),
                message: e.to_string(),
            })?;

        let origin = Place::from_query(query.from);
        let destination = Place::from_query(query.to);
        let traveler = &query.context.traveler;

        let routes = response
            .journeys
            .iter()
            .take(query.max_itineraries.max(1))
            .map(|journey| {
                let input = AssemblyInput::new(traveler, &origin, &destination, journey)
                    .with_preferences(query.context.preferences.as_ref());
                self.assembler.assemble(&input)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(from = %query.from, to = %query.to, routes = routes.len(), "planned");

        Ok(routes)
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.journeys.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.journeys.invalidate_all();
    }
}

impl ItineraryProvider for CachedPlanner {
    async fn plan_itinerary(&self, query: &LegQuery<'_>) -> Result<Vec<Route>, OptimizeError> {
        self.plan(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, PointRole, Preferences, TravelerContext};
    use crate::optimizer::RequestContext;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    const METRO_JOURNEYS: &str = r#"{
        "journeys": [
            {
                "departure_date_time": "20240315T100000",
                "arrival_date_time": "20240315T101500",
                "sections": [
                    {
                        "type": "public_transport",
                        "display_informations": {"commercial_mode": "Métro", "code": "1"},
                        "stop_date_times": [
                            {"stop_point": {"id": "sp:1", "name": "Nation"}},
                            {"stop_point": {"id": "sp:2", "name": "Reuilly-Diderot"}},
                            {"stop_point": {"id": "sp:3", "name": "Bastille"}}
                        ]
                    }
                ]
            },
            {
                "departure_date_time": "20240315T100500",
                "arrival_date_time": "20240315T102500",
                "sections": []
            }
        ]
    }"#;

    fn departure() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn planner_with(files: &[(&str, &str)]) -> (tempfile::TempDir, CachedPlanner) {
        let dir = tempdir().unwrap();
        for (name, body) in files {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        let mock = MockNavitiaClient::new(dir.path()).unwrap();
        let planner = CachedPlanner::new(JourneySource::Mock(mock), &CacheConfig::default());
        (dir, planner)
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_capacity, 1000);
    }

    #[tokio::test]
    async fn plans_and_assembles() {
        let (_dir, planner) = planner_with(&[("Nation--Bastille.json", METRO_JOURNEYS)]);
        let context = RequestContext::new(TravelerContext::new("traveler-1")).with_preferences(
            Preferences {
                comfort_mode: true,
                eco_mode: false,
            },
        );
        let query = LegQuery {
            from: "Nation",
            to: "Bastille",
            departure: departure(),
            max_itineraries: 5,
            context: &context,
        };

        let routes = planner.plan_itinerary(&query).await.unwrap();

        assert_eq!(routes.len(), 2);
        let route = &routes[0];
        assert_eq!(route.traveler_id, "traveler-1");
        assert_eq!(route.origin_label, "Nation");
        assert_eq!(route.destination_label, "Bastille");
        assert!(route.comfort_mode);
        assert_eq!(route.duration_secs(), 900);
        assert_eq!(route.segments.len(), 1);
        assert_eq!(route.segments[0].points[1].role, PointRole::IntermediateStop);
        assert!(routes[1].segments.is_empty());
    }

    #[tokio::test]
    async fn count_limits_routes_and_repeat_is_cached() {
        let (_dir, planner) = planner_with(&[("Nation--Bastille.json", METRO_JOURNEYS)]);
        let context = RequestContext::new(TravelerContext::new("t"));
        let query = LegQuery {
            from: "Nation",
            to: "Bastille",
            departure: departure(),
            max_itineraries: 1,
            context: &context,
        };

        let first = planner.plan(&query).await.unwrap();
        let second = planner.plan(&query).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first, second);

        planner.journeys.run_pending_tasks().await;
        assert_eq!(planner.cache_entry_count(), 1);

        planner.invalidate_cache();
        planner.journeys.run_pending_tasks().await;
        assert_eq!(planner.cache_entry_count(), 0);
    }

    #[tokio::test]
    async fn coordinate_queries_become_coordinates() {
        let (_dir, planner) =
            planner_with(&[("48.846000,2.377000--Bastille.json", METRO_JOURNEYS)]);
        let context = RequestContext::new(TravelerContext::new("t"));
        let query = LegQuery {
            from: "48.846000,2.377000",
            to: "Bastille",
            departure: departure(),
            max_itineraries: 1,
            context: &context,
        };

        let routes = planner.plan(&query).await.unwrap();
        assert_eq!(
            routes[0].origin_coordinates,
            Some(Coordinates::new(48.846, 2.377))
        );
        assert!(routes[0].destination_coordinates.is_none());
    }

    #[tokio::test]
    async fn no_solution_is_empty() {
        let (_dir, planner) = planner_with(&[(
            "Nation--Nowhere.json",
            r#"{"error": {"id": "no_solution", "message": "no solution"}}"#,
        )]);
        let context = RequestContext::new(TravelerContext::new("t"));
        let query = LegQuery {
            from: "Nation",
            to: "Nowhere",
            departure: departure(),
            max_itineraries: 1,
            context: &context,
        };

        assert!(planner.plan(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn provider_error_becomes_planning_error() {
        let (_dir, planner) = planner_with(&[("Nation--Bastille.json", METRO_JOURNEYS)]);
        let context = RequestContext::new(TravelerContext::new("t"));
        let query = LegQuery {
            from: "Bastille",
            to: "Nation",
            departure: departure(),
            max_itineraries: 1,
            context: &context,
        };

        let err = planner.plan(&query).await.unwrap_err();
        match err {
            OptimizeError::Planning { from, to, .. } => {
                assert_eq!(from, "Bastille");
                assert_eq!(to, "Nation");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
