// Station service - Use cases for browsing the monitoring network
use crate::application::aggregation::filter_by_trailing_window;
use crate::application::observatory_api::ObservatoryApi;
use crate::application::statistics::{compute_stats, SeriesStats};
use crate::domain::period::PeriodField;
use crate::domain::series::{series_rows, Row, TimeWindow};
use crate::domain::station::{MetricCatalog, Region, Station};
use serde::Serialize;
use std::sync::Arc;

const VALUE_FIELD: &str = "valor";

#[derive(Debug, Clone, Serialize)]
pub struct StationSeries {
    pub rows: Vec<Row>,
    pub stats: Option<SeriesStats>,
}

#[derive(Clone)]
pub struct StationService {
    api: Arc<dyn ObservatoryApi>,
}

impl StationService {
    pub fn new(api: Arc<dyn ObservatoryApi>) -> Self {
        Self { api }
    }

    pub async fn list_regions(&self) -> anyhow::Result<Vec<Region>> {
        self.api.list_regions().await
    }

    pub async fn list_stations(&self, region_id: &str) -> anyhow::Result<Vec<Station>> {
        let stations = self.api.list_stations(region_id).await?;
        let unplaced = stations.iter().filter(|s| !s.has_location()).count();
        if unplaced > 0 {
            tracing::debug!("{} stations in region {} have no coordinates", unplaced, region_id);
        }
        Ok(stations)
    }

    pub async fn list_metrics(&self, station: &str) -> anyhow::Result<Vec<MetricCatalog>> {
        self.api.list_metrics(station).await
    }

    /// One series as `{periodo, valor}` rows, limited to the trailing window
    pub async fn station_series(
        &self,
        station: &str,
        metric: &str,
        sub_metric: &str,
        window: TimeWindow,
    ) -> anyhow::Result<StationSeries> {
        let points = self.api.fetch_series(station, metric, sub_metric).await?;
        let rows = series_rows(&points, PeriodField::Periodo, VALUE_FIELD);
        let rows = filter_by_trailing_window(rows, window, PeriodField::Periodo);
        let stats = compute_stats(&rows, VALUE_FIELD);
        Ok(StationSeries { rows, stats })
    }
}
