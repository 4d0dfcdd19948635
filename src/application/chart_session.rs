// Series list of one chart being built
use crate::domain::series::{Series, SeriesPoint, SeriesSelection};

#[derive(Debug, Default)]
pub struct ChartSession {
    series: Vec<Series>,
    next_id: usize,
}

impl ChartSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a series in loading state and return its id
    pub fn begin(&mut self, selection: &SeriesSelection) -> String {
        self.next_id += 1;
        let id = format!("serie_{}", self.next_id);
        self.series.push(Series::pending(id.clone(), selection));
        id
    }

    /// Apply a fetch result. Failures roll the series back; results for
    /// series removed in the meantime are discarded. Returns whether the
    /// series is now loaded.
    pub fn complete<E>(&mut self, id: &str, result: Result<Vec<SeriesPoint>, E>) -> bool {
        let Some(idx) = self.series.iter().position(|s| s.id == id) else {
            tracing::debug!("Discarding result for removed series {}", id);
            return false;
        };
        match result {
            Ok(points) => {
                let series = &mut self.series[idx];
                series.points = points;
                series.loading = false;
                true
            }
            Err(_) => {
                self.series.remove(idx);
                false
            }
        }
    }

    #[cfg(test)]
    pub fn remove(&mut self, id: &str) -> Option<Series> {
        let idx = self.series.iter().position(|s| s.id == id)?;
        Some(self.series.remove(idx))
    }

    #[cfg(test)]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn into_series(self) -> Vec<Series> {
        self.series
    }
}
