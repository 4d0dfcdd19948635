// Series and chart row domain models
use super::period::PeriodField;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub period: String,
    pub value: Option<f64>,
}

impl SeriesPoint {
    pub fn new(period: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            period: period.into(),
            value,
        }
    }

    /// The value, if present and finite
    pub fn valid_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }
}

/// What the user picked in the region -> station -> metric -> sub-metric wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSelection {
    #[serde(default)]
    pub region_id: Option<String>,
    pub station: String,
    pub metric: String,
    pub sub_metric: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: String,
    pub station: String,
    pub metric: String,
    pub sub_metric: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, skip_serializing)]
    pub loading: bool,
    #[serde(default)]
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn pending(id: String, selection: &SeriesSelection) -> Self {
        Self {
            id,
            station: selection.station.clone(),
            metric: selection.metric.clone(),
            sub_metric: selection.sub_metric.clone(),
            color: selection.color.clone(),
            loading: true,
            points: Vec::new(),
        }
    }

    /// Display name: "Station - Metric (Sub-metric)"
    pub fn label(&self) -> String {
        format!("{} - {} ({})", self.station, self.metric, self.sub_metric)
    }

    /// Loaded and holding at least one point
    pub fn is_ready(&self) -> bool {
        !self.loading && !self.points.is_empty()
    }
}

/// Monthly (raw) or annual (mean per year) chart granularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalView {
    #[default]
    Monthly,
    Annual,
}

/// Trailing window relative to the latest data point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    All,
    Years(u32),
}

impl std::str::FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(TimeWindow::All);
        }
        s.parse::<u32>()
            .map(TimeWindow::Years)
            .map_err(|_| format!("invalid time window '{}', expected a number of years or 'all'", s))
    }
}

/// One period with the values of every series that has data for it.
///
/// Serialises flat, e.g. `{"periodo": "2023-01", "s1": 10.0}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub field: PeriodField,
    pub period: String,
    pub values: BTreeMap<String, f64>,
}

impl Row {
    pub fn new(field: PeriodField, period: impl Into<String>) -> Self {
        Self {
            field,
            period: period.into(),
            values: BTreeMap::new(),
        }
    }

    #[cfg(test)]
    pub fn with_value(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry(self.field.as_str(), &self.period)?;
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Rows of a single series, value stored under `key`
pub fn series_rows(points: &[SeriesPoint], field: PeriodField, key: &str) -> Vec<Row> {
    points
        .iter()
        .map(|p| {
            let mut row = Row::new(field, p.period.clone());
            if let Some(v) = p.valid_value() {
                row.values.insert(key.to_string(), v);
            }
            row
        })
        .collect()
}
