// Chart service - Use case for building a custom multi-series chart
use crate::application::assembler::assemble;
use crate::application::chart_session::ChartSession;
use crate::application::correlation::{compute_correlations, CorrelationResult};
use crate::application::observatory_api::ObservatoryApi;
use crate::application::statistics::{compute_stats_for_fields, FieldStats};
use crate::domain::series::{Row, Series, SeriesSelection, TemporalView};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    pub series: Vec<SeriesSelection>,
    #[serde(default)]
    pub years_filter: Option<u32>,
    #[serde(default)]
    pub temporal_view: TemporalView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesFailure {
    pub station: String,
    pub metric: String,
    pub sub_metric: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub series: Vec<Series>,
    pub rows: Vec<Row>,
    pub stats: Vec<FieldStats>,
    pub correlations: Vec<CorrelationResult>,
    pub failed: Vec<SeriesFailure>,
}

#[derive(Clone)]
pub struct ChartService {
    api: Arc<dyn ObservatoryApi>,
}

impl ChartService {
    pub fn new(api: Arc<dyn ObservatoryApi>) -> Self {
        Self { api }
    }

    pub async fn build(&self, request: ChartRequest) -> ChartView {
        let mut session = ChartSession::new();
        let pending: Vec<(String, &SeriesSelection)> = request
            .series
            .iter()
            .map(|selection| (session.begin(selection), selection))
            .collect();

        // Series loads are independent; a failure only drops that series
        let fetches = pending.iter().map(|(_, selection)| {
            self.api
                .fetch_series(&selection.station, &selection.metric, &selection.sub_metric)
        });
        let results = join_all(fetches).await;

        let mut failed = Vec::new();
        for ((id, selection), result) in pending.iter().zip(results) {
            if let Err(e) = &result {
                tracing::warn!(
                    "Error fetching series {}/{}/{}: {:#}",
                    selection.station,
                    selection.metric,
                    selection.sub_metric,
                    e
                );
                failed.push(SeriesFailure {
                    station: selection.station.clone(),
                    metric: selection.metric.clone(),
                    sub_metric: selection.sub_metric.clone(),
                    message: format!("{:#}", e),
                });
            }
            session.complete(id, result);
        }

        let series = session.into_series();
        let rows = assemble(&series, request.years_filter, request.temporal_view);
        let ids: Vec<String> = series.iter().map(|s| s.id.clone()).collect();
        let stats = compute_stats_for_fields(&rows, &ids);
        let correlations = compute_correlations(&series);

        tracing::debug!(
            "Built chart with {} series, {} rows, {} correlations",
            series.len(),
            rows.len(),
            correlations.len()
        );

        ChartView {
            series,
            rows,
            stats,
            correlations,
            failed,
        }
    }
}
