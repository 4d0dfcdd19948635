// Descriptive statistics per series
use crate::domain::series::Row;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub std_dev: f64,
}

impl SeriesStats {
    /// Statistics over the finite values; `None` when there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut vals: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if vals.is_empty() {
            return None;
        }

        let count = vals.len();
        vals.sort_by(|a, b| a.total_cmp(b));

        let mean = vals.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (vals[count / 2 - 1] + vals[count / 2]) / 2.0
        } else {
            vals[count / 2]
        };
        let variance = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            mean,
            median,
            min: vals[0],
            max: vals[count - 1],
            count,
            std_dev: variance.sqrt(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStats {
    pub field: String,
    #[serde(flatten)]
    pub stats: SeriesStats,
}

pub fn compute_stats(rows: &[Row], field: &str) -> Option<SeriesStats> {
    SeriesStats::from_values(rows.iter().filter_map(|r| r.get(field)))
}

/// One entry per field that has data. Match on `field`, not position.
pub fn compute_stats_for_fields(rows: &[Row], fields: &[String]) -> Vec<FieldStats> {
    fields
        .iter()
        .filter_map(|field| {
            compute_stats(rows, field).map(|stats| FieldStats {
                field: field.clone(),
                stats,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::period::PeriodField;

    fn rows(values: &[f64]) -> Vec<Row> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Row::new(PeriodField::Periodo, format!("2023-{:02}", i + 1)).with_value("f", *v))
            .collect()
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(compute_stats(&rows(&[1.0, 2.0, 3.0, 4.0]), "f").unwrap().median, 2.5);
        assert_eq!(compute_stats(&rows(&[1.0, 2.0, 3.0]), "f").unwrap().median, 2.0);
        assert_eq!(compute_stats(&rows(&[4.0, 1.0, 3.0]), "f").unwrap().median, 3.0);
    }

    #[test]
    fn test_basic_stats() {
        let stats = compute_stats(&rows(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), "f").unwrap();
        assert_eq!(stats.count, 8);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let mut data = rows(&[f64::NAN, 3.0]);
        data.push(Row::new(PeriodField::Periodo, "2023-09"));
        let stats = compute_stats(&data, "f").unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 3.0);
    }

    #[test]
    fn test_no_values_is_none() {
        assert!(compute_stats(&[], "f").is_none());
        assert!(compute_stats(&rows(&[1.0]), "otro").is_none());
    }

    #[test]
    fn test_multi_field_omits_empty_fields() {
        let data = vec![
            Row::new(PeriodField::Periodo, "2023-01").with_value("b", 1.0),
            Row::new(PeriodField::Periodo, "2023-02").with_value("b", 3.0),
        ];
        let fields = vec!["a".to_string(), "b".to_string()];
        let out = compute_stats_for_fields(&data, &fields);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].field, "b");
        assert_eq!(out[0].stats.mean, 2.0);
    }
}
