// Saved chart configurations
use super::series::{Series, TemporalView};
use serde::{Deserialize, Serialize};

/// A chart configuration as submitted by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChart {
    pub name: String,
    #[serde(default)]
    pub series: Vec<Series>,
    #[serde(default)]
    pub years_filter: Option<u32>,
    #[serde(default)]
    pub temporal_view: TemporalView,
}

/// Record layout in the remote collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRecord {
    #[serde(flatten)]
    pub chart: NewChart,
    pub owner_id: String,
    /// RFC 3339, stamped by the client
    pub created_at: String,
    /// Server ordering timestamp; `{".sv": "timestamp"}` before it is resolved
    #[serde(default)]
    pub timestamp: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedChart {
    pub id: String,
    #[serde(flatten)]
    pub chart: NewChart,
    pub owner_id: String,
    pub created_at: String,
}

impl SavedChart {
    pub fn from_record(id: String, record: ChartRecord) -> Self {
        Self {
            id,
            chart: record.chart,
            owner_id: record.owner_id,
            created_at: record.created_at,
        }
    }
}
