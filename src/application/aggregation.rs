// Temporal aggregation - trailing window filter and yearly means
use crate::domain::period::{extract_year, parse_period, PeriodField};
use crate::domain::series::{Row, TimeWindow};
use chrono::Months;
use std::collections::BTreeMap;

/// Keep the rows within `window` years of the most recent parsable period.
///
/// Rows whose label does not parse are dropped while a window is active.
/// Retained rows keep their input order.
pub fn filter_by_trailing_window(rows: Vec<Row>, window: TimeWindow, field: PeriodField) -> Vec<Row> {
    let years = match window {
        TimeWindow::All => return rows,
        TimeWindow::Years(years) => years,
    };
    if rows.is_empty() {
        return rows;
    }

    let Some(anchor) = rows.iter().filter_map(|r| parse_period(&r.period)).max() else {
        tracing::debug!("No parsable {} labels, window filter drops all rows", field.as_str());
        return Vec::new();
    };
    // a window reaching past the earliest representable date has no lower bound
    let cutoff = anchor.checked_sub_months(Months::new(years.saturating_mul(12)));

    rows.into_iter()
        .filter(|row| {
            parse_period(&row.period)
                .map(|date| cutoff.is_none_or(|cutoff| cutoff <= date) && date <= anchor)
                .unwrap_or(false)
        })
        .collect()
}

/// Average every value field per calendar year.
///
/// The year is the first 4-digit run of the period label; rows without one
/// are excluded. A field without values in a year is left out of that row.
pub fn aggregate_to_yearly(rows: &[Row], value_fields: &[String]) -> Vec<Row> {
    let mut by_year: BTreeMap<i32, Vec<&Row>> = BTreeMap::new();
    let mut excluded = 0usize;

    for row in rows {
        match extract_year(&row.period) {
            Some(year) => by_year.entry(year).or_default().push(row),
            None => excluded += 1,
        }
    }

    if excluded > 0 {
        tracing::debug!("Excluded {} rows without a year from yearly aggregation", excluded);
    }

    by_year
        .into_iter()
        .map(|(year, group)| {
            let mut out = Row::new(PeriodField::Anio, year.to_string());
            for field in value_fields {
                let values: Vec<f64> = group
                    .iter()
                    .filter_map(|r| r.get(field))
                    .filter(|v| v.is_finite())
                    .collect();
                if !values.is_empty() {
                    let mean = values.iter().sum::<f64>() / values.len() as f64;
                    out.values.insert(field.clone(), mean);
                }
            }
            out
        })
        .collect()
}
