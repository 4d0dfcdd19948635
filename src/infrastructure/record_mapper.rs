// Mapper from raw backend JSON to validated domain types
use crate::domain::period::parse_period;
use crate::domain::series::SeriesPoint;
use crate::domain::station::{MetricCatalog, MetricFamily};
use serde_json::Value;

const PERIOD_KEYS: [&str; 3] = ["periodo", "mes", "anio"];
const VALUE_KEY: &str = "valor";

/// Validate raw series records into points sorted by period.
///
/// Records without a period label are dropped. Values that are missing,
/// non-numeric or implausible for the metric family become `None`.
/// Labels that do not parse are kept after the parsable ones.
pub fn records_to_points(records: &[Value], metric: &str, sub_metric: &str) -> Vec<SeriesPoint> {
    let family = MetricFamily::from_metric(metric);
    let mut dropped = 0usize;

    let mut points: Vec<SeriesPoint> = records
        .iter()
        .filter_map(|record| {
            let point = record_to_point(record, sub_metric, family);
            if point.is_none() {
                dropped += 1;
            }
            point
        })
        .collect();

    if dropped > 0 {
        tracing::debug!("Dropped {} records without a period for {}/{}", dropped, metric, sub_metric);
    }

    // stable: equal keys keep the backend order
    points.sort_by_key(|p| match parse_period(&p.period) {
        Some(date) => (0, Some(date)),
        None => (1, None),
    });
    points
}

fn record_to_point(record: &Value, sub_metric: &str, family: MetricFamily) -> Option<SeriesPoint> {
    let object = record.as_object()?;

    let period = PERIOD_KEYS.iter().find_map(|key| match object.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })?;

    let value = object
        .get(VALUE_KEY)
        .or_else(|| object.get(sub_metric))
        .and_then(number)
        .filter(|v| family.accepts(*v));

    Some(SeriesPoint::new(period, value))
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

/// Metrics response: object keyed by metric name, each value either an
/// array of sub-metric names or an object keyed by them.
pub fn metrics_catalog(value: &Value) -> anyhow::Result<Vec<MetricCatalog>> {
    let Some(object) = value.as_object() else {
        anyhow::bail!("Expected metrics object, got {}", kind(value));
    };

    Ok(object
        .iter()
        .map(|(name, subs)| {
            let sub_metrics = match subs {
                Value::Array(items) => items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Object(o) => o
                            .get("nombre")
                            .or_else(|| o.get("name"))
                            .and_then(Value::as_str)
                            .map(str::to_string),
                        _ => None,
                    })
                    .collect(),
                Value::Object(o) => o.keys().cloned().collect(),
                _ => Vec::new(),
            };
            MetricCatalog {
                name: name.clone(),
                sub_metrics,
            }
        })
        .collect())
}

/// Series response: an array of records, or an object wrapping one under
/// `datos`/`data`
pub fn series_records(value: Value) -> anyhow::Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut o) => match o.remove("datos").or_else(|| o.remove("data")) {
            Some(Value::Array(items)) => Ok(items),
            _ => anyhow::bail!("Series response object has no data array"),
        },
        other => anyhow::bail!("Expected series array, got {}", kind(&other)),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_to_points() {
        let records = vec![
            json!({"periodo": "2023-02", "valor": 20.5}),
            json!({"periodo": "2023-01", "valor": "10,5"}),
            json!({"mes": "2022 Diciembre", "valor": null}),
            json!({"valor": 3.0}),
            json!("basura"),
        ];
        let points = records_to_points(&records, "Caudal", "Medio");

        assert_eq!(
            points,
            vec![
                SeriesPoint::new("2022 Diciembre", None),
                SeriesPoint::new("2023-01", Some(10.5)),
                SeriesPoint::new("2023-02", Some(20.5)),
            ]
        );
    }

    #[test]
    fn test_sub_metric_field_and_numeric_year() {
        let records = vec![json!({"anio": 2021, "Maxima": 31.2})];
        let points = records_to_points(&records, "Temperatura", "Maxima");
        assert_eq!(points, vec![SeriesPoint::new("2021", Some(31.2))]);
    }

    #[test]
    fn test_implausible_values_become_missing() {
        let records = vec![
            json!({"periodo": "2023-01", "valor": 140.0}),
            json!({"periodo": "2023-02", "valor": 55.0}),
        ];
        let points = records_to_points(&records, "Humedad relativa", "Media");
        assert_eq!(points[0].value, None);
        assert_eq!(points[1].value, Some(55.0));
    }

    #[test]
    fn test_unparsable_labels_sort_last_in_backend_order() {
        let records = vec![
            json!({"periodo": "zeta", "valor": 1.0}),
            json!({"periodo": "2023-05", "valor": 2.0}),
            json!({"periodo": "alfa", "valor": 3.0}),
        ];
        let labels: Vec<String> = records_to_points(&records, "Caudal", "Medio")
            .into_iter()
            .map(|p| p.period)
            .collect();
        assert_eq!(labels, vec!["2023-05", "zeta", "alfa"]);
    }

    #[test]
    fn test_metrics_catalog_shapes() {
        let value = json!({
            "Temperatura": ["Media", "Maxima"],
            "Humedad": {"Relativa": {}, "Absoluta": {}},
            "PM10": [{"nombre": "Diario"}]
        });
        let catalog = metrics_catalog(&value).unwrap();
        let temp = catalog.iter().find(|m| m.name == "Temperatura").unwrap();
        assert_eq!(temp.sub_metrics, vec!["Media", "Maxima"]);
        let hum = catalog.iter().find(|m| m.name == "Humedad").unwrap();
        assert_eq!(hum.sub_metrics.len(), 2);
        let pm = catalog.iter().find(|m| m.name == "PM10").unwrap();
        assert_eq!(pm.sub_metrics, vec!["Diario"]);

        assert!(metrics_catalog(&json!([])).is_err());
    }

    #[test]
    fn test_series_records_unwraps_data() {
        assert_eq!(series_records(json!([{"periodo": "2023-01"}])).unwrap().len(), 1);
        assert_eq!(series_records(json!({"datos": [1, 2]})).unwrap().len(), 2);
        assert!(series_records(json!({"otro": []})).is_err());
        assert!(series_records(json!(null)).is_err());
    }
}
