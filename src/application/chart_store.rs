// Ports for saved chart persistence
use crate::domain::saved_chart::{ChartRecord, NewChart};
use async_trait::async_trait;

/// Flat remote collection of chart records
#[async_trait]
pub trait ChartStore: Send + Sync {
    /// Append a record, returning the generated key
    async fn push(&self, record: &ChartRecord) -> anyhow::Result<String>;

    /// Every record in the collection, regardless of owner
    async fn fetch_all(&self) -> anyhow::Result<Vec<(String, ChartRecord)>>;

    async fn remove(&self, id: &str) -> anyhow::Result<()>;

    /// Value to place in `timestamp` so the store assigns the ordering time
    fn server_timestamp(&self) -> serde_json::Value;
}

/// Charts saved locally before remote persistence existed
#[async_trait]
pub trait LegacyChartStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<Vec<NewChart>>;

    async fn clear(&self) -> anyhow::Result<()>;
}
