use tracing::info;
use tracing_subscriber::EnvFilter;

use waypoint_planner::cache::{CachedPlanner, JourneySource};
use waypoint_planner::config::{ServerConfig, SourceConfig};
use waypoint_planner::navitia::{MockNavitiaClient, NavitiaClient};
use waypoint_planner::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("waypoint_planner=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    let source = match config.source {
        SourceConfig::Live(navitia) => {
            info!(base_url = %navitia.base_url, coverage = %navitia.coverage, "using Navitia API");
            let client = NavitiaClient::new(navitia).expect("Failed to create Navitia client");
            JourneySource::Live(client)
        }
        SourceConfig::Mock(dir) => {
            let mock = MockNavitiaClient::new(&dir).expect("Failed to load mock data");
            info!(dir = %dir.display(), pairs = mock.len().await, "using mock data");
            JourneySource::Mock(mock)
        }
    };

    let planner = CachedPlanner::new(source, &config.cache);
    let state = AppState::new(planner, config.optimizer);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    info!(addr = %config.bind_addr, "waypoint planner listening");
    info!("  GET  /health              - Health check");
    info!("  POST /itinerary/plan      - Plan a route");
    info!("  POST /itinerary/optimize  - Plan a route through the best task");

    axum::serve(listener, app).await.expect("Server error");
}
