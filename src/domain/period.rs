// Period labels - parsing of the upstream month/year labels
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

const SPANISH_MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Name of the record field holding the period label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodField {
    Periodo,
    Mes,
    Anio,
}

impl PeriodField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodField::Periodo => "periodo",
            PeriodField::Mes => "mes",
            PeriodField::Anio => "anio",
        }
    }
}

/// Parse a monthly label into the first day of that month.
///
/// Accepts `"2023 Enero"` (case-sensitive Spanish month names) and
/// `"2023-01"`. Anything else yields `None`.
pub fn parse_period(label: &str) -> Option<NaiveDate> {
    if let Some((year, month_name)) = label.split_once(' ') {
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let month = SPANISH_MONTHS.iter().position(|m| *m == month_name)?;
        let year: i32 = year.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month as u32 + 1, 1);
    }

    let (year, month) = label.split_once('-')?;
    if year.is_empty() || month.is_empty() || !is_digits(year) || !is_digits(month) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// First run of four consecutive ASCII digits in the label, anywhere.
pub fn extract_year(label: &str) -> Option<i32> {
    let bytes = label.as_bytes();
    let mut run = 0;
    for (idx, b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            run += 1;
            if run == 4 {
                return label[idx - 3..=idx].parse().ok();
            }
        } else {
            run = 0;
        }
    }
    None
}

/// Lenient date parsing for ISO-like labels: RFC 3339, `YYYY-MM-DD`,
/// `YYYY-MM` and `YYYY`. Spanish month labels are not understood.
pub fn parse_loose_date(label: &str) -> Option<NaiveDate> {
    let label = label.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(label) {
        return Some(ts.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(label, "%Y-%m-%d") {
        return Some(date);
    }
    if let Some((year, month)) = label.split_once('-') {
        if year.len() == 4 && is_digits(year) && (1..=2).contains(&month.len()) && is_digits(month) {
            return NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1);
        }
        return None;
    }
    if label.len() == 4 && is_digits(label) {
        return NaiveDate::from_ymd_opt(label.parse().ok()?, 1, 1);
    }
    None
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
