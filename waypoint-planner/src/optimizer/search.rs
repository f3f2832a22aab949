//! Best-waypoint search.
//!
//! For each candidate, plans origin -> waypoint and waypoint -> destination
//! as two independent provider calls and stitches them together. The
//! fastest candidate wins, and its first leg is then re-planned with several
//! alternatives to offer the traveller a choice.

use std::future::Future;

use chrono::NaiveDateTime;
use futures::FutureExt;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::domain::{DomainError, Preferences, Route, TravelerContext, WaypointCandidate};

use super::config::OptimizerConfig;
use super::merge::merge_routes;
use super::rank::{rank_by_duration, select_best};

/// Error from waypoint optimization or route planning.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OptimizeError {
    /// Invalid planning request
    #[error("invalid planning request: {0}")]
    InvalidRequest(String),

    /// The provider failed to plan a leg
    #[error("failed to plan {from} -> {to}: {message}")]
    Planning {
        from: String,
        to: String,
        message: String,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Who the plan is for and how they like to travel.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub traveler: TravelerContext,
    pub preferences: Option<Preferences>,
}

impl RequestContext {
    pub fn new(traveler: TravelerContext) -> Self {
        Self {
            traveler,
            preferences: None,
        }
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = Some(preferences);
        self
    }
}

/// An origin -> destination planning request.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Opaque location query for the origin (free text or `"lat,lon"`).
    pub origin_query: String,

    /// Opaque location query for the destination.
    pub destination_query: String,

    /// Earliest departure time.
    pub departure: NaiveDateTime,

    pub context: RequestContext,
}

impl PlanRequest {
    /// Create a new planning request.
    pub fn new(
        origin_query: impl Into<String>,
        destination_query: impl Into<String>,
        departure: NaiveDateTime,
        context: RequestContext,
    ) -> Self {
        Self {
            origin_query: origin_query.into(),
            destination_query: destination_query.into(),
            departure,
            context,
        }
    }

    /// Validate the planning request.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.origin_query.trim().is_empty() {
            return Err(OptimizeError::InvalidRequest(
                "origin query is blank".to_string(),
            ));
        }

        if self.destination_query.trim().is_empty() {
            return Err(OptimizeError::InvalidRequest(
                "destination query is blank".to_string(),
            ));
        }

        Ok(())
    }
}

/// One call to the route-planning provider.
#[derive(Debug, Clone, Copy)]
pub struct LegQuery<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub departure: NaiveDateTime,
    /// How many alternative itineraries to ask for (at least 1).
    pub max_itineraries: usize,
    pub context: &'a RequestContext,
}

/// Trait for planning assembled routes between two locations.
///
/// This abstraction allows the optimizer to be tested with mock data.
pub trait ItineraryProvider: Send + Sync {
    /// Plan up to `query.max_itineraries` routes.
    ///
    /// An empty list means no itinerary exists; errors are reserved for
    /// provider failures.
    fn plan_itinerary(
        &self,
        query: &LegQuery<'_>,
    ) -> impl Future<Output = Result<Vec<Route>, OptimizeError>> + Send;
}

/// A candidate's two legs merged into one route.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub candidate: WaypointCandidate,
    pub route: Route,
    /// Sum of both legs' durations.
    pub total_duration_secs: i64,
}

impl Evaluation {
    fn into_optimized(self, base_duration_secs: i64) -> OptimizedRoute {
        OptimizedRoute {
            route: self.route,
            waypoints: vec![self.candidate],
            total_duration_secs: self.total_duration_secs,
            base_duration_secs,
        }
    }
}

/// A route through zero or more waypoints, with its cost.
#[derive(Debug, Clone)]
pub struct OptimizedRoute {
    pub route: Route,
    pub waypoints: Vec<WaypointCandidate>,
    pub total_duration_secs: i64,
    /// Duration of the direct origin -> destination route.
    pub base_duration_secs: i64,
}

impl OptimizedRoute {
    /// Extra travel time caused by the waypoints. Negative if the detour
    /// route is faster than the reported direct route.
    pub fn detour_seconds(&self) -> i64 {
        self.total_duration_secs - self.base_duration_secs
    }
}

/// Waypoint optimizer.
pub struct Optimizer<'a, P: ItineraryProvider> {
    provider: &'a P,
    config: &'a OptimizerConfig,
}

impl<'a, P: ItineraryProvider> Optimizer<'a, P> {
    /// Create a new optimizer.
    pub fn new(provider: &'a P, config: &'a OptimizerConfig) -> Self {
        Self { provider, config }
    }

    /// Find the fastest waypoint and return up to
    /// `config.max_alternatives` routes through it, fastest first.
    ///
    /// An empty candidate list returns immediately without calling the
    /// provider. Candidates that can't be planned are skipped; if none can,
    /// the result is empty.
    pub async fn plan_with_best_waypoint(
        &self,
        request: &PlanRequest,
        candidates: &[WaypointCandidate],
    ) -> Result<Vec<OptimizedRoute>, OptimizeError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        request.validate()?;

        let pending: Vec<_> = candidates
            .iter()
            .map(|candidate| self.evaluate(request, candidate, request.departure).boxed())
            .collect();

        let evaluations: Vec<Evaluation> = stream::iter(pending)
            .buffered(self.config.concurrency())
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .flatten()
            .collect();

        debug!(
            candidates = candidates.len(),
            feasible = evaluations.len(),
            "evaluated waypoint candidates"
        );

        let Some(best) = select_best(evaluations) else {
            info!("no feasible waypoint candidate");
            return Ok(Vec::new());
        };

        info!(
            candidate = %best.candidate.id,
            total_secs = best.total_duration_secs,
            "selected waypoint"
        );

        let base_duration_secs = match self.base_duration(request).await {
            Some(secs) => secs,
            None => {
                debug!(
                    candidate = %best.candidate.id,
                    "base route unavailable, using waypoint duration"
                );
                best.total_duration_secs
            }
        };

        let alternatives = self
            .enumerate_alternatives(request, &best.candidate, base_duration_secs)
            .await;

        if alternatives.is_empty() {
            debug!(candidate = %best.candidate.id, "no alternatives, keeping best route");
            return Ok(vec![best.into_optimized(base_duration_secs)]);
        }

        Ok(alternatives)
    }

    /// Plan origin -> `candidate` -> destination, departing at `departure`.
    ///
    /// Returns `None` if the candidate is ineligible or either leg can't be
    /// planned.
    pub async fn evaluate(
        &self,
        request: &PlanRequest,
        candidate: &WaypointCandidate,
        departure: NaiveDateTime,
    ) -> Option<Evaluation> {
        if !candidate.is_eligible() {
            debug!(candidate = %candidate.id, "skipping ineligible candidate");
            return None;
        }

        let location = candidate.resolve_query()?;

        let leg_a = self
            .plan_first(request, &request.origin_query, &location, departure)
            .await?;
        let leg_b = self
            .plan_first(
                request,
                &location,
                &request.destination_query,
                leg_a.planned_arrival,
            )
            .await?;

        let total_duration_secs = leg_a.duration_secs() + leg_b.duration_secs();
        let route = self.stitch(request, leg_a, leg_b)?;

        debug!(
            candidate = %candidate.id,
            total_secs = total_duration_secs,
            "candidate feasible"
        );

        Some(Evaluation {
            candidate: candidate.clone(),
            route,
            total_duration_secs,
        })
    }

    /// Re-plan the first leg to `candidate` with several options, pair each
    /// with a fresh second leg, and return the results fastest first.
    ///
    /// Options whose second leg can't be planned are dropped.
    pub async fn enumerate_alternatives(
        &self,
        request: &PlanRequest,
        candidate: &WaypointCandidate,
        base_duration_secs: i64,
    ) -> Vec<OptimizedRoute> {
        let Some(location) = candidate.resolve_query() else {
            return Vec::new();
        };
        let location = location.as_str();
        let max = self.config.max_alternatives;

        let first_legs = self
            .plan(request, &request.origin_query, location, request.departure, max)
            .await
            .unwrap_or_default();

        debug!(
            candidate = %candidate.id,
            options = first_legs.len(),
            "enumerating alternatives"
        );

        let pending: Vec<_> = first_legs
            .into_iter()
            .take(max)
            .map(|leg_a| {
                async move {
                    let leg_b = self
                        .plan_first(
                            request,
                            location,
                            &request.destination_query,
                            leg_a.planned_arrival,
                        )
                        .await?;
                    let total_duration_secs = leg_a.duration_secs() + leg_b.duration_secs();
                    let route = self.stitch(request, leg_a, leg_b)?;

                    Some(OptimizedRoute {
                        route,
                        waypoints: vec![candidate.clone()],
                        total_duration_secs,
                        base_duration_secs,
                    })
                }
                .boxed()
            })
            .collect();

        let alternatives: Vec<OptimizedRoute> = stream::iter(pending)
            .buffered(self.config.concurrency())
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .flatten()
            .collect();

        rank_by_duration(alternatives)
    }

    /// Duration of the direct route, if one can be planned.
    async fn base_duration(&self, request: &PlanRequest) -> Option<i64> {
        self.plan_first(
            request,
            &request.origin_query,
            &request.destination_query,
            request.departure,
        )
        .await
        .map(|route| route.duration_secs())
    }

    /// Merge two legs into one route spanning both.
    fn stitch(&self, request: &PlanRequest, leg_a: Route, leg_b: Route) -> Option<Route> {
        let departure = leg_a.planned_departure;
        let arrival = leg_b.planned_arrival;

        merge_routes(&request.context, &[leg_a, leg_b], departure, arrival)
            .inspect_err(|e| warn!(error = %e, "failed to merge legs"))
            .ok()
    }

    /// The provider's best route, or `None` on failure or no solution.
    async fn plan_first(
        &self,
        request: &PlanRequest,
        from: &str,
        to: &str,
        departure: NaiveDateTime,
    ) -> Option<Route> {
        self.plan(request, from, to, departure, 1)
            .await
            .and_then(|routes| routes.into_iter().next())
    }

    /// Call the provider, converting failures and empty answers to `None`.
    async fn plan(
        &self,
        request: &PlanRequest,
        from: &str,
        to: &str,
        departure: NaiveDateTime,
        max_itineraries: usize,
    ) -> Option<Vec<Route>> {
        let query = LegQuery {
            from,
            to,
            departure,
            max_itineraries: max_itineraries.max(1),
            context: &request.context,
        };

        match self.provider.plan_itinerary(&query).await {
            Ok(routes) if routes.is_empty() => {
                debug!(%from, %to, "no itinerary");
                None
            }
            Ok(routes) => Some(routes),
            Err(e) => {
                warn!(%from, %to, error = %e, "planning failed");
                None
            }
        }
    }
}
