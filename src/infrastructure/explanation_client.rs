// Client for the AI chart explanation service
use crate::infrastructure::config::ExplanationSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationRequest {
    pub chart_config: serde_json::Value,
    pub data_points: serde_json::Value,
    #[serde(default)]
    pub user_context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplanationResponse {
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct ExplanationClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    open: AtomicBool,
}

impl ExplanationClient {
    pub fn init(settings: &ExplanationSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build explanation HTTP client")?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            open: AtomicBool::new(true),
        })
    }

    /// Stop accepting requests; later calls to `explain` fail
    pub fn shutdown(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            tracing::info!("Explanation client shut down");
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub async fn explain(&self, request: &ExplanationRequest) -> Result<ExplanationResponse> {
        if !self.is_open() {
            anyhow::bail!("Explanation client has been shut down");
        }

        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to send request to explanation service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Explanation service failed with status {}: {}", status, body);
        }

        let explanation = response
            .json::<ExplanationResponse>()
            .await
            .context("Failed to parse explanation response")?;

        if let Some(error) = &explanation.error {
            tracing::warn!("Explanation service reported: {}", error);
        }
        Ok(explanation)
    }
}
