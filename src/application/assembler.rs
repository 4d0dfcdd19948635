// Chart data assembly - merge series into period rows
use crate::application::aggregation::aggregate_to_yearly;
use crate::domain::period::{extract_year, parse_loose_date, PeriodField};
use crate::domain::series::{Row, Series, TemporalView};
use chrono::{Months, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Merge the loaded series into one row per period, anchored on today.
pub fn assemble(series: &[Series], years_filter: Option<u32>, view: TemporalView) -> Vec<Row> {
    assemble_at(series, years_filter, view, Utc::now().date_naive())
}

/// Merge the loaded series into one row per period.
///
/// With `years_filter`, points dated strictly before `today - N years` are
/// dropped. Points whose label is not a recognisable date are always kept.
/// Rows are ordered by label, which relies on zero-padded ISO-like labels.
pub fn assemble_at(
    series: &[Series],
    years_filter: Option<u32>,
    view: TemporalView,
    today: NaiveDate,
) -> Vec<Row> {
    let cutoff = years_filter.and_then(|years| today.checked_sub_months(Months::new(years.saturating_mul(12))));

    let mut rows: BTreeMap<&str, Row> = BTreeMap::new();
    let mut ids = Vec::new();

    for s in series.iter().filter(|s| s.is_ready()) {
        ids.push(s.id.clone());
        for point in &s.points {
            if let Some(cutoff) = cutoff {
                if let Some(date) = parse_loose_date(&point.period) {
                    if date < cutoff {
                        continue;
                    }
                }
            }
            let row = rows
                .entry(point.period.as_str())
                .or_insert_with(|| Row::new(PeriodField::Periodo, point.period.clone()));
            if let Some(value) = point.valid_value() {
                row.values.insert(s.id.clone(), value);
            }
        }
    }

    let rows: Vec<Row> = rows.into_values().collect();

    if view == TemporalView::Annual && !rows.is_empty() {
        let mut yearly = aggregate_to_yearly(&rows, &ids);
        yearly.sort_by_key(|r| extract_year(&r.period));
        return yearly;
    }

    rows
}
