// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use anyhow::Context;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::chart_service::ChartService;
use crate::application::chart_store::ChartStore;
use crate::application::saved_charts::SavedChartService;
use crate::application::station_service::StationService;
use crate::infrastructure::config::load_config;
use crate::infrastructure::explanation_client::ExplanationClient;
use crate::infrastructure::firebase_store::FirebaseChartStore;
use crate::infrastructure::memory_store::MemoryChartStore;
use crate::infrastructure::rest_api::RestObservatoryApi;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    build_chart, delete_chart, explain_chart, health_check, list_metrics, list_regions,
    list_saved_charts, list_stations, migrate_legacy_charts, save_chart, station_series,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;

    // Upstream backend (infrastructure layer)
    let api = Arc::new(RestObservatoryApi::new(config.backend.clone())?);

    let store: Arc<dyn ChartStore> = match &config.firebase.database_url {
        Some(url) => {
            tracing::info!("Persisting charts to Firebase at {}", url);
            Arc::new(FirebaseChartStore::new(url.clone(), &config.firebase))
        }
        None => {
            tracing::warn!("No Firebase database configured, saved charts are kept in memory");
            Arc::new(MemoryChartStore::new())
        }
    };

    let explanation = match &config.explanation {
        Some(settings) => Some(Arc::new(ExplanationClient::init(settings)?)),
        None => None,
    };

    // Services (application layer)
    let state = Arc::new(AppState {
        station_service: StationService::new(api.clone()),
        chart_service: ChartService::new(api),
        saved_charts: SavedChartService::new(store),
        explanation: explanation.clone(),
        legacy_dir: PathBuf::from(&config.legacy.directory),
    });

    // Router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/regions", get(list_regions))
        .route("/regions/:region_id/stations", get(list_stations))
        .route("/stations/:station/metrics", get(list_metrics))
        .route(
            "/stations/:station/metrics/:metric/:sub_metric",
            get(station_series),
        )
        .route("/charts/build", post(build_chart))
        .route("/charts/explain", post(explain_chart))
        .route("/charts/:id", delete(delete_chart))
        .route(
            "/owners/:owner_id/charts",
            get(list_saved_charts).post(save_chart),
        )
        .route("/owners/:owner_id/charts/migrate", post(migrate_legacy_charts))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!("Starting observatorio service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(client) = explanation {
        client.shutdown();
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
