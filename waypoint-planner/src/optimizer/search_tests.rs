//! Unit tests for the best-waypoint search.

use super::*;
use crate::domain::{
    Coordinates, LineInfo, Point, PointRole, Route, Segment, SegmentKind, TransitMode,
    TravelerContext, WaypointCandidate,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

/// A one-segment route from `from` to `to` taking `secs` seconds.
fn make_route(from: &str, to: &str, secs: i64) -> Route {
    let departure = at(9, 0);
    let arrival = departure + Duration::seconds(secs);

    let mut origin = Point::new(0, PointRole::Origin, from);
    origin.departure = Some(departure);
    let mut destination = Point::new(1, PointRole::Destination, to);
    destination.arrival = Some(arrival);

    Route {
        traveler_id: "traveler-1".into(),
        origin_label: from.into(),
        destination_label: to.into(),
        origin_coordinates: None,
        destination_coordinates: None,
        planned_departure: departure,
        planned_arrival: arrival,
        comfort_mode: false,
        eco_mode: false,
        segments: vec![Segment {
            sequence: 0,
            kind: SegmentKind::PublicTransport,
            mode: TransitMode::Metro,
            line: LineInfo::default(),
            departure: Some(departure),
            arrival: Some(arrival),
            duration_secs: Some(secs),
            distance_m: 0,
            air_conditioned: false,
            points: vec![origin, destination],
        }],
    }
}

fn task(id: &str) -> WaypointCandidate {
    WaypointCandidate::new(id, format!("Task {id}"))
        .with_query(id)
        .with_coordinates(Coordinates::new(48.85, 2.35))
}

fn request() -> PlanRequest {
    PlanRequest::new(
        "Home",
        "Office",
        at(8, 30),
        RequestContext::new(TravelerContext::new("traveler-1")),
    )
}

type Pair = (String, String);

#[derive(Debug, Clone)]
struct Call {
    from: String,
    to: String,
    departure: NaiveDateTime,
    max_itineraries: usize,
}

/// Mock itinerary provider for testing.
#[derive(Default)]
struct MockProvider {
    routes: HashMap<Pair, Vec<Route>>,
    failing: HashSet<Pair>,
    /// Fail any request asking for more than one itinerary.
    fail_multi: bool,
    /// Return every stored route regardless of the requested count.
    ignore_count: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockProvider {
    fn new() -> Self {
        Self::default()
    }

    /// Register routes for `from -> to`, each taking the given seconds.
    fn add(&mut self, from: &str, to: &str, durations: &[i64]) {
        let routes = durations.iter().map(|s| make_route(from, to, *s)).collect();
        self.routes.insert((from.into(), to.into()), routes);
    }

    fn fail(&mut self, from: &str, to: &str) {
        self.failing.insert((from.into(), to.into()));
    }

    fn api_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn was_queried(&self, location: &str) -> bool {
        self.calls()
            .iter()
            .any(|c| c.from == location || c.to == location)
    }
}

impl ItineraryProvider for MockProvider {
    async fn plan_itinerary(&self, query: &LegQuery<'_>) -> Result<Vec<Route>, OptimizeError> {
        self.calls.lock().unwrap().push(Call {
            from: query.from.to_string(),
            to: query.to.to_string(),
            departure: query.departure,
            max_itineraries: query.max_itineraries,
        });

        let key = (query.from.to_string(), query.to.to_string());
        if self.failing.contains(&key) || (self.fail_multi && query.max_itineraries > 1) {
            return Err(OptimizeError::Planning {
                from: key.0,
                to: key.1,
                message: "HTTP 503".into(),
            });
        }

        let mut routes = self.routes.get(&key).cloned().unwrap_or_default();
        if !self.ignore_count {
            routes.truncate(query.max_itineraries);
        }
        Ok(routes)
    }
}

fn durations(results: &[OptimizedRoute]) -> Vec<i64> {
    results.iter().map(|r| r.total_duration_secs).collect()
}

#[tokio::test]
async fn empty_candidates_make_no_calls() {
    let provider = MockProvider::new();
    let config = OptimizerConfig::default();
    let optimizer = Optimizer::new(&provider, &config);

    let results = optimizer
        .plan_with_best_waypoint(&request(), &[])
        .await
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(provider.api_call_count(), 0);
}

#[tokio::test]
async fn empty_candidates_skip_validation() {
    let provider = MockProvider::new();
    let config = OptimizerConfig::default();
    let optimizer = Optimizer::new(&provider, &config);

    let mut bad = request();
    bad.origin_query = "  ".into();

    let results = optimizer.plan_with_best_waypoint(&bad, &[]).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(provider.api_call_count(), 0);
}

#[tokio::test]
async fn blank_query_is_invalid() {
    let provider = MockProvider::new();
    let config = OptimizerConfig::default();
    let optimizer = Optimizer::new(&provider, &config);

    let mut bad = request();
    bad.destination_query = String::new();

    let result = optimizer.plan_with_best_waypoint(&bad, &[task("X")]).await;
    assert!(matches!(result, Err(OptimizeError::InvalidRequest(_))));
    assert_eq!(provider.api_call_count(), 0);
}

#[tokio::test]
async fn fastest_candidate_wins_and_alternatives_are_sorted() {
    // X: 900 + 900 = 1800, Y: 600 + 900 = 1500, Z has no coordinates
    let mut provider = MockProvider::new();
    provider.add("Home", "X", &[900]);
    provider.add("X", "Office", &[900]);
    provider.add("Home", "Y", &[600, 1000, 700]);
    provider.add("Y", "Office", &[900]);
    provider.add("Home", "Office", &[1200]);

    let z = WaypointCandidate::new("Z", "Task Z").with_query("Z");
    let config = OptimizerConfig::default();
    let optimizer = Optimizer::new(&provider, &config);

    let results = optimizer
        .plan_with_best_waypoint(&request(), &[task("X"), task("Y"), z])
        .await
        .unwrap();

    assert_eq!(durations(&results), vec![1500, 1600, 1900]);
    for result in &results {
        assert_eq!(result.waypoints.len(), 1);
        assert_eq!(result.waypoints[0].id, "Y");
        assert_eq!(result.waypoints[0].title, "Task Y");
        assert_eq!(result.base_duration_secs, 1200);
        assert_eq!(result.route.origin_label, "Home");
        assert_eq!(result.route.destination_label, "Office");
        assert_eq!(result.route.segments.len(), 2);
    }
    assert_eq!(results[0].detour_seconds(), 300);
    assert!(!provider.was_queried("Z"));
}

#[tokio::test]
async fn enumeration_requests_several_first_legs() {
    let mut provider = MockProvider::new();
    provider.add("Home", "Y", &[600, 700]);
    provider.add("Y", "Office", &[900]);
    provider.add("Home", "Office", &[1200]);

    let config = OptimizerConfig::default().with_max_alternatives(3);
    let optimizer = Optimizer::new(&provider, &config);

    optimizer
        .plan_with_best_waypoint(&request(), &[task("Y")])
        .await
        .unwrap();

    let multi: Vec<Call> = provider
        .calls()
        .into_iter()
        .filter(|c| c.max_itineraries > 1)
        .collect();
    assert_eq!(multi.len(), 1);
    assert_eq!(multi[0].from, "Home");
    assert_eq!(multi[0].to, "Y");
    assert_eq!(multi[0].max_itineraries, 3);
}

#[tokio::test]
async fn second_leg_departs_at_first_leg_arrival() {
    let mut provider = MockProvider::new();
    provider.add("Home", "Y", &[600]);
    provider.add("Y", "Office", &[900]);

    let config = OptimizerConfig::default();
    let optimizer = Optimizer::new(&provider, &config);

    let evaluation = optimizer
        .evaluate(&request(), &task("Y"), at(8, 30))
        .await
        .unwrap();
    assert_eq!(evaluation.total_duration_secs, 1500);

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].departure, at(8, 30));
    assert_eq!(calls[0].max_itineraries, 1);
    assert_eq!(calls[1].from, "Y");
    assert_eq!(calls[1].departure, at(9, 10));
}

#[tokio::test]
async fn coordinate_query_synthesized_when_text_missing() {
    let mut provider = MockProvider::new();
    provider.add("Home", "48.850000,2.350000", &[600]);
    provider.add("48.850000,2.350000", "Office", &[600]);

    let config = OptimizerConfig::default();
    let optimizer = Optimizer::new(&provider, &config);

    let candidate =
        WaypointCandidate::new("p", "Pharmacy").with_coordinates(Coordinates::new(48.85, 2.35));
    let evaluation = optimizer.evaluate(&request(), &candidate, at(8, 30)).await;

    assert_eq!(evaluation.map(|e| e.total_duration_secs), Some(1200));
}

#[tokio::test]
async fn ineligible_candidates_make_no_calls() {
    let provider = MockProvider::new();
    let config = OptimizerConfig::default();
    let optimizer = Optimizer::new(&provider, &config);

    let done = task("X").completed();
    let nowhere = WaypointCandidate::new("Z", "Task Z").with_query("Somewhere");

    let results = optimizer
        .plan_with_best_waypoint(&request(), &[done, nowhere])
        .await
        .unwrap();

    assert!(results.is_empty());
    assert_eq!(provider.api_call_count(), 0);
}

#[tokio::test]
async fn candidate_without_second_leg_is_skipped() {
    let mut provider = MockProvider::new();
    provider.add("Home", "X", &[300]);
    // no X -> Office
    provider.add("Home", "Y", &[600]);
    provider.add("Y", "Office", &[900]);
    provider.add("Home", "Office", &[1200]);

    let config = OptimizerConfig::default();
    let optimizer = Optimizer::new(&provider, &config);

    let results = optimizer
        .plan_with_best_waypoint(&request(), &[task("X"), task("Y")])
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].waypoints[0].id, "Y");
}

#[tokio::test]
async fn provider_error_is_isolated_to_its_candidate() {
    let mut provider = MockProvider::new();
    provider.fail("Home", "X");
    provider.add("Home", "Y", &[600]);
    provider.add("Y", "Office", &[900]);
    provider.add("Home", "Office", &[1200]);

    let config = OptimizerConfig::default();
    let optimizer = Optimizer::new(&provider, &config);

    let results = optimizer
        .plan_with_best_waypoint(&request(), &[task("X"), task("Y")])
        .await
        .unwrap();

    assert_eq!(durations(&results), vec![1500]);
    assert_eq!(results[0].waypoints[0].id, "Y");
}

#[tokio::test]
async fn nothing_feasible_returns_empty() {
    let mut provider = MockProvider::new();
    provider.fail("Home", "X");
    provider.add("Home", "Office", &[1200]);

    let config = OptimizerConfig::default();
    let optimizer = Optimizer::new(&provider, &config);

    let results = optimizer
        .plan_with_best_waypoint(&request(), &[task("X"), task("Y")])
        .await
        .unwrap();

    assert!(results.is_empty());
    // base route is only planned once a winner exists
    assert!(
        !provider
            .calls()
            .iter()
            .any(|c| c.from == "Home" && c.to == "Office")
    );
}

#[tokio::test]
async fn base_failure_falls_back_to_winner_duration() {
    let mut provider = MockProvider::new();
    provider.add("Home", "Y", &[600]);
    provider.add("Y", "Office", &[900]);
    provider.fail("Home", "Office");

    let config = OptimizerConfig::default();
    let optimizer = Optimizer::new(&provider, &config);

    let results = optimizer
        .plan_with_best_waypoint(&request(), &[task("Y")])
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].base_duration_secs, 1500);
    assert_eq!(results[0].detour_seconds(), 0);
}

#[tokio::test]
async fn failed_enumeration_falls_back_to_best() {
    let mut provider = MockProvider::new();
    provider.add("Home", "Y", &[600, 700]);
    provider.add("Y", "Office", &[900]);
    provider.add("Home", "Office", &[1200]);
    provider.fail_multi = true;

    let config = OptimizerConfig::default();
    let optimizer = Optimizer::new(&provider, &config);

    let results = optimizer
        .plan_with_best_waypoint(&request(), &[task("Y")])
        .await
        .unwrap();

    assert_eq!(durations(&results), vec![1500]);
    assert_eq!(results[0].waypoints[0].id, "Y");
    assert_eq!(results[0].base_duration_secs, 1200);
}

#[tokio::test]
async fn alternatives_capped() {
    let mut provider = MockProvider::new();
    provider.add("Home", "Y", &[900, 800, 700, 600, 500, 400, 300]);
    provider.add("Y", "Office", &[100]);
    provider.add("Home", "Office", &[1200]);
    provider.ignore_count = true;

    let config = OptimizerConfig::default();
    let optimizer = Optimizer::new(&provider, &config);

    let results = optimizer
        .plan_with_best_waypoint(&request(), &[task("Y")])
        .await
        .unwrap();

    // first five options, sorted
    assert_eq!(durations(&results), vec![600, 700, 800, 900, 1000]);
}

#[tokio::test]
async fn tie_goes_to_first_candidate() {
    let mut provider = MockProvider::new();
    provider.add("Home", "A", &[600]);
    provider.add("A", "Office", &[600]);
    provider.add("Home", "B", &[600]);
    provider.add("B", "Office", &[600]);
    provider.add("Home", "Office", &[900]);

    let config = OptimizerConfig::default().with_max_concurrent_plans(1);
    let optimizer = Optimizer::new(&provider, &config);

    let results = optimizer
        .plan_with_best_waypoint(&request(), &[task("B"), task("A")])
        .await
        .unwrap();

    assert_eq!(results[0].waypoints[0].id, "B");
}

#[tokio::test]
async fn merged_route_is_densely_sequenced() {
    let mut provider = MockProvider::new();
    provider.add("Home", "Y", &[600]);
    provider.add("Y", "Office", &[900]);

    let config = OptimizerConfig::default();
    let optimizer = Optimizer::new(&provider, &config);

    let evaluation = optimizer
        .evaluate(&request(), &task("Y"), at(8, 30))
        .await
        .unwrap();

    let route = &evaluation.route;
    assert_eq!(route.segments.len(), 2);
    assert_eq!(route.segments[0].sequence, 0);
    assert_eq!(route.segments[1].sequence, 1);
    assert_eq!(route.segments[1].points[0].name, "Y");
    assert_eq!(route.planned_departure, at(9, 0));
    assert_eq!(route.planned_arrival, at(9, 15));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn search_runs_on_spawned_task() {
    let mut provider = MockProvider::new();
    provider.add("Home", "X", &[900]);
    provider.add("X", "Office", &[900]);
    provider.add("Home", "Y", &[600, 700]);
    provider.add("Y", "Office", &[900]);
    provider.add("Home", "Office", &[1200]);
    let provider = std::sync::Arc::new(provider);

    let handle = tokio::spawn({
        let provider = provider.clone();
        async move {
            let config = OptimizerConfig::default();
            let optimizer = Optimizer::new(provider.as_ref(), &config);
            optimizer
                .plan_with_best_waypoint(&request(), &[task("X"), task("Y")])
                .await
        }
    });

    let results = handle.await.unwrap().unwrap();
    assert_eq!(durations(&results), vec![1500, 1600]);
    assert_eq!(results[0].waypoints[0].id, "Y");
}
