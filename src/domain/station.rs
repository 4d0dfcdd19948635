// Monitoring network catalog: regions, stations, metrics
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(alias = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "latitud", alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "longitud", alias = "lon")]
    pub longitude: Option<f64>,
}

impl Station {
    /// Whether the station can be placed on the map
    pub fn has_location(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCatalog {
    pub name: String,
    pub sub_metrics: Vec<String>,
}

/// Metric families with plausibility bounds applied at the fetch boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricFamily {
    Temperature,
    Humidity,
    Pollutant,
    Other,
}

const POLLUTANTS: [&str; 7] = ["pm10", "pm2.5", "pm25", "o3", "no2", "so2", "co"];

impl MetricFamily {
    pub fn from_metric(metric: &str) -> Self {
        let lower = metric.to_lowercase();
        if lower.contains("temperatura") {
            MetricFamily::Temperature
        } else if lower.contains("humedad") {
            MetricFamily::Humidity
        } else if lower.contains("contaminante")
            || lower
                .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
                .any(|word| POLLUTANTS.contains(&word))
        {
            MetricFamily::Pollutant
        } else {
            MetricFamily::Other
        }
    }

    pub fn accepts(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self {
            MetricFamily::Temperature => (-90.0..=60.0).contains(&value),
            MetricFamily::Humidity => (0.0..=100.0).contains(&value),
            MetricFamily::Pollutant => value >= 0.0,
            MetricFamily::Other => true,
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}
