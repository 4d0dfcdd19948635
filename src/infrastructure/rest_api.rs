// REST client for the regions/stations/metrics backend
use crate::application::observatory_api::ObservatoryApi;
use crate::domain::series::SeriesPoint;
use crate::domain::station::{MetricCatalog, Region, Station};
use crate::infrastructure::config::{prepare_path, BackendSettings};
use crate::infrastructure::record_mapper::{metrics_catalog, records_to_points, series_records};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RestObservatoryApi {
    client: reqwest::Client,
    settings: BackendSettings,
}

impl RestObservatoryApi {
    pub fn new(settings: BackendSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build backend HTTP client")?;

        Ok(Self {
            client,
            settings: BackendSettings {
                base_url: settings.base_url.trim_end_matches('/').to_string(),
                ..settings
            },
        })
    }

    fn build_url(&self, template: &str, vars: &HashMap<&str, &str>) -> String {
        format!("{}{}", self.settings.base_url, prepare_path(template, vars))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Backend request to {} failed with status {}: {}", url, status, body);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }
}

#[async_trait]
impl ObservatoryApi for RestObservatoryApi {
    async fn list_regions(&self) -> Result<Vec<Region>> {
        let url = self.build_url(&self.settings.regions_path, &HashMap::new());
        self.get_json(&url).await
    }

    async fn list_stations(&self, region_id: &str) -> Result<Vec<Station>> {
        let vars = HashMap::from([("region", region_id)]);
        let url = self.build_url(&self.settings.stations_path, &vars);
        self.get_json(&url).await
    }

    async fn list_metrics(&self, station: &str) -> Result<Vec<MetricCatalog>> {
        let vars = HashMap::from([("station", station)]);
        let url = self.build_url(&self.settings.metrics_path, &vars);
        let value: serde_json::Value = self.get_json(&url).await?;
        metrics_catalog(&value)
    }

    async fn fetch_series(
        &self,
        station: &str,
        metric: &str,
        sub_metric: &str,
    ) -> Result<Vec<SeriesPoint>> {
        let vars = HashMap::from([
            ("station", station),
            ("metric", metric),
            ("sub_metric", sub_metric),
        ]);
        let url = self.build_url(&self.settings.series_path, &vars);
        let value: serde_json::Value = self.get_json(&url).await?;
        let records = series_records(value)?;

        let points = records_to_points(&records, metric, sub_metric);
        tracing::debug!(
            "Fetched {} points for {}/{}/{}",
            points.len(),
            station,
            metric,
            sub_metric
        );
        Ok(points)
    }
}
