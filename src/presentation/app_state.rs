// Application state for HTTP handlers
use crate::application::chart_service::ChartService;
use crate::application::saved_charts::SavedChartService;
use crate::application::station_service::StationService;
use crate::infrastructure::explanation_client::ExplanationClient;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub station_service: StationService,
    pub chart_service: ChartService,
    pub saved_charts: SavedChartService,
    pub explanation: Option<Arc<ExplanationClient>>,
    pub legacy_dir: PathBuf,
}
