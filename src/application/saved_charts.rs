// Saved chart service - Use cases for saving, listing and migrating charts
use crate::application::chart_store::{ChartStore, LegacyChartStore};
use crate::domain::saved_chart::{ChartRecord, NewChart, SavedChart};
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct SavedChartService {
    store: Arc<dyn ChartStore>,
}

impl SavedChartService {
    pub fn new(store: Arc<dyn ChartStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, owner_id: &str, chart: NewChart) -> anyhow::Result<String> {
        let record = ChartRecord {
            chart,
            owner_id: owner_id.to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            timestamp: self.store.server_timestamp(),
        };
        let id = self.store.push(&record).await?;
        tracing::debug!("Saved chart {} for owner {}", id, owner_id);
        Ok(id)
    }

    /// Charts of `owner_id`, newest first.
    ///
    /// Reads the whole collection and filters here, so the cost grows with
    /// the charts of every user.
    pub async fn load_all(&self, owner_id: &str) -> anyhow::Result<Vec<SavedChart>> {
        let mut charts: Vec<SavedChart> = self
            .store
            .fetch_all()
            .await?
            .into_iter()
            .filter(|(_, record)| record.owner_id == owner_id)
            .map(|(id, record)| SavedChart::from_record(id, record))
            .collect();

        charts.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
        Ok(charts)
    }

    /// Removes by id only; ownership is not verified.
    pub async fn delete(&self, id: &str) -> anyhow::Result<()> {
        self.store.remove(id).await
    }

    /// Re-save every legacy chart under `owner_id`, then clear the legacy
    /// collection. Stops at the first failed save without clearing, so
    /// charts already copied will be copied again on retry.
    pub async fn migrate_legacy(
        &self,
        owner_id: &str,
        legacy: &dyn LegacyChartStore,
    ) -> anyhow::Result<usize> {
        let charts = legacy.load().await?;
        if charts.is_empty() {
            return Ok(0);
        }

        let mut migrated = 0;
        for chart in charts {
            self.save(owner_id, chart).await?;
            migrated += 1;
        }
        legacy.clear().await?;

        tracing::info!("Migrated {} legacy charts for owner {}", migrated, owner_id);
        Ok(migrated)
    }
}

fn created_at(chart: &SavedChart) -> Option<DateTime<chrono::FixedOffset>> {
    DateTime::parse_from_rfc3339(&chart.created_at).ok()
}
