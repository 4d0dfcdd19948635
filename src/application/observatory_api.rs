// Port for the upstream regions/stations/metrics backend
use crate::domain::series::SeriesPoint;
use crate::domain::station::{MetricCatalog, Region, Station};
use async_trait::async_trait;

#[async_trait]
pub trait ObservatoryApi: Send + Sync {
    /// List all monitoring regions
    async fn list_regions(&self) -> anyhow::Result<Vec<Region>>;

    /// List the stations of a region
    async fn list_stations(&self, region_id: &str) -> anyhow::Result<Vec<Station>>;

    /// List the metrics (and their sub-metrics) recorded at a station
    async fn list_metrics(&self, station: &str) -> anyhow::Result<Vec<MetricCatalog>>;

    /// Fetch one series, validated and sorted by period
    async fn fetch_series(
        &self,
        station: &str,
        metric: &str,
        sub_metric: &str,
    ) -> anyhow::Result<Vec<SeriesPoint>>;
}
