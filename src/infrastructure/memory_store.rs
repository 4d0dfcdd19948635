// In-process chart store
use crate::application::chart_store::ChartStore;
use crate::domain::saved_chart::ChartRecord;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryChartStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: BTreeMap<String, ChartRecord>,
    seq: u64,
}

impl MemoryChartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChartStore for MemoryChartStore {
    async fn push(&self, record: &ChartRecord) -> Result<String> {
        let mut inner = self.inner.lock().await;
        inner.seq += 1;
        // chronological keys, like Firebase push ids
        let key = format!("mem-{:013}-{:06}", Utc::now().timestamp_millis(), inner.seq);
        inner.records.insert(key.clone(), record.clone());
        Ok(key)
    }

    async fn fetch_all(&self) -> Result<Vec<(String, ChartRecord)>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .records
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.inner.lock().await.records.remove(id);
        Ok(())
    }

    fn server_timestamp(&self) -> serde_json::Value {
        serde_json::json!(Utc::now().timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::saved_chart::NewChart;
    use crate::domain::series::TemporalView;

    fn record(owner: &str) -> ChartRecord {
        ChartRecord {
            chart: NewChart {
                name: "Prueba".to_string(),
                series: Vec::new(),
                years_filter: None,
                temporal_view: TemporalView::Annual,
            },
            owner_id: owner.to_string(),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            timestamp: serde_json::Value::Null,
        }
    }

    #[tokio::test]
    async fn test_push_fetch_remove() {
        let store = MemoryChartStore::new();
        let a = store.push(&record("ana")).await.unwrap();
        let b = store.push(&record("luis")).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.fetch_all().await.unwrap().len(), 2);

        store.remove(&a).await.unwrap();
        let left = store.fetch_all().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].0, b);

        // removing an unknown id is not an error
        store.remove("nada").await.unwrap();
    }
}
