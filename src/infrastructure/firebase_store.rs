// Firebase Realtime Database chart store over the REST API
use crate::application::chart_store::ChartStore;
use crate::domain::saved_chart::ChartRecord;
use crate::infrastructure::config::FirebaseSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct FirebaseChartStore {
    client: reqwest::Client,
    database_url: String,
    auth_token: Option<String>,
    charts_path: String,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

impl FirebaseChartStore {
    pub fn new(database_url: String, settings: &FirebaseSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            database_url: database_url.trim_end_matches('/').to_string(),
            auth_token: settings.auth_token.clone(),
            charts_path: settings.charts_path.trim_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        self.with_auth(format!("{}/{}.json", self.database_url, self.charts_path))
    }

    fn record_url(&self, id: &str) -> String {
        self.with_auth(format!(
            "{}/{}/{}.json",
            self.database_url,
            self.charts_path,
            urlencoding::encode(id)
        ))
    }

    fn with_auth(&self, url: String) -> String {
        match &self.auth_token {
            Some(token) => format!("{}?auth={}", url, urlencoding::encode(token)),
            None => url,
        }
    }

    async fn check(response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Firebase {} failed with status {}: {}", action, status, body);
        }
        Ok(response)
    }
}

#[async_trait]
impl ChartStore for FirebaseChartStore {
    async fn push(&self, record: &ChartRecord) -> Result<String> {
        let response = self
            .client
            .post(self.collection_url())
            .json(record)
            .send()
            .await
            .context("Failed to send chart to Firebase")?;

        let pushed = Self::check(response, "push")
            .await?
            .json::<PushResponse>()
            .await
            .context("Failed to parse Firebase push response")?;
        Ok(pushed.name)
    }

    async fn fetch_all(&self) -> Result<Vec<(String, ChartRecord)>> {
        let response = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .context("Failed to fetch charts from Firebase")?;

        // An empty collection comes back as `null`
        let collection = Self::check(response, "read")
            .await?
            .json::<Option<HashMap<String, serde_json::Value>>>()
            .await
            .context("Failed to parse Firebase charts")?
            .unwrap_or_default();

        let mut records = Vec::with_capacity(collection.len());
        for (id, value) in collection {
            match serde_json::from_value::<ChartRecord>(value) {
                Ok(record) => records.push((id, record)),
                Err(e) => tracing::warn!("Skipping malformed chart record {}: {}", id, e),
            }
        }
        Ok(records)
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.record_url(id))
            .send()
            .await
            .context("Failed to delete chart from Firebase")?;
        Self::check(response, "delete").await?;
        Ok(())
    }

    fn server_timestamp(&self) -> serde_json::Value {
        serde_json::json!({ ".sv": "timestamp" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(token: Option<&str>) -> FirebaseSettings {
        FirebaseSettings {
            database_url: None,
            auth_token: token.map(str::to_string),
            charts_path: "/charts/".to_string(),
        }
    }

    #[test]
    fn test_urls_without_auth() {
        let store = FirebaseChartStore::new("https://obs.firebaseio.com/".to_string(), &settings(None));
        assert_eq!(store.collection_url(), "https://obs.firebaseio.com/charts.json");
        assert_eq!(store.record_url("-Nx1"), "https://obs.firebaseio.com/charts/-Nx1.json");
    }

    #[test]
    fn test_urls_with_auth() {
        let store = FirebaseChartStore::new("https://obs.firebaseio.com".to_string(), &settings(Some("s3cr=t")));
        assert_eq!(
            store.collection_url(),
            "https://obs.firebaseio.com/charts.json?auth=s3cr%3Dt"
        );
    }

    #[test]
    fn test_server_timestamp_placeholder() {
        let store = FirebaseChartStore::new("https://obs.firebaseio.com".to_string(), &settings(None));
        assert_eq!(store.server_timestamp()[".sv"], "timestamp");
    }
}
