// Pairwise Pearson correlation between chart series
use crate::domain::series::Series;
use serde::Serialize;
use std::collections::BTreeMap;

const MIN_SHARED_POINTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Strength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
    VeryWeak,
}

impl Strength {
    pub fn classify(r: f64) -> Self {
        let abs = r.abs();
        if abs >= 0.9 {
            Strength::VeryStrong
        } else if abs >= 0.7 {
            Strength::Strong
        } else if abs >= 0.5 {
            Strength::Moderate
        } else if abs >= 0.3 {
            Strength::Weak
        } else {
            Strength::VeryWeak
        }
    }

    fn adjective(&self) -> &'static str {
        match self {
            Strength::VeryStrong => "muy fuerte",
            Strength::Strong => "fuerte",
            Strength::Moderate => "moderada",
            Strength::Weak => "débil",
            Strength::VeryWeak => "muy débil",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Positive,
    Negative,
    None,
}

impl Direction {
    /// |r| <= 0.1 counts as no direction
    pub fn classify(r: f64) -> Self {
        if r > 0.1 {
            Direction::Positive
        } else if r < -0.1 {
            Direction::Negative
        } else {
            Direction::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationResult {
    pub series_a: String,
    pub series_b: String,
    pub label_a: String,
    pub label_b: String,
    pub coefficient: f64,
    pub strength: Strength,
    pub direction: Direction,
    pub scatter: Vec<ScatterPoint>,
    pub interpretation: String,
}

/// Pearson's r by the sum-of-products formula. Zero variance gives 0.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    let nf = n as f64;

    let (mut sx, mut sy, mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys.iter()) {
        sx += x;
        sy += y;
        sxy += x * y;
        sxx += x * x;
        syy += y * y;
    }

    let numerator = nf * sxy - sx * sy;
    let denominator = ((nf * sxx - sx * sx) * (nf * syy - sy * sy)).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    (numerator / denominator).clamp(-1.0, 1.0)
}

/// Correlate every pair of loaded series sharing at least three periods.
pub fn compute_correlations(series: &[Series]) -> Vec<CorrelationResult> {
    let ready: Vec<&Series> = series.iter().filter(|s| s.is_ready()).collect();

    let mut results = Vec::new();
    for i in 0..ready.len() {
        for j in (i + 1)..ready.len() {
            if let Some(result) = correlate_pair(ready[i], ready[j]) {
                results.push(result);
            }
        }
    }
    results
}

/// `None` when the pair has too few paired samples.
pub fn correlate_pair(a: &Series, b: &Series) -> Option<CorrelationResult> {
    let values_a = by_period(a);
    let values_b = by_period(b);

    let shared: Vec<&str> = values_a
        .keys()
        .filter(|p| values_b.contains_key(*p))
        .copied()
        .collect();
    if shared.len() < MIN_SHARED_POINTS {
        return None;
    }

    let scatter: Vec<ScatterPoint> = shared
        .iter()
        .filter_map(|p| match (values_a[p], values_b[p]) {
            (Some(x), Some(y)) => Some(ScatterPoint { x, y }),
            _ => None,
        })
        .collect();
    if scatter.len() < MIN_SHARED_POINTS {
        return None;
    }

    let xs: Vec<f64> = scatter.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = scatter.iter().map(|p| p.y).collect();
    let coefficient = pearson(&xs, &ys);
    let strength = Strength::classify(coefficient);
    let direction = Direction::classify(coefficient);
    let (label_a, label_b) = (a.label(), b.label());

    Some(CorrelationResult {
        interpretation: interpret(direction, strength, &label_a, &label_b),
        series_a: a.id.clone(),
        series_b: b.id.clone(),
        label_a,
        label_b,
        coefficient,
        strength,
        direction,
        scatter,
    })
}

fn by_period(series: &Series) -> BTreeMap<&str, Option<f64>> {
    series
        .points
        .iter()
        .map(|p| (p.period.as_str(), p.valid_value()))
        .collect()
}

fn interpret(direction: Direction, strength: Strength, a: &str, b: &str) -> String {
    match direction {
        Direction::None => format!(
            "No se observa una relación lineal clara entre {} y {}.",
            a, b
        ),
        Direction::Positive => format!(
            "Correlación positiva {}: cuando {} aumenta, {} tiende a aumentar.",
            strength.adjective(),
            a,
            b
        ),
        Direction::Negative => format!(
            "Correlación negativa {}: cuando {} aumenta, {} tiende a disminuir.",
            strength.adjective(),
            a,
            b
        ),
    }
}
