// HTTP request handlers
use crate::application::chart_service::{ChartRequest, ChartView};
use crate::application::station_service::StationSeries;
use crate::domain::saved_chart::{NewChart, SavedChart};
use crate::domain::series::TimeWindow;
use crate::domain::station::{MetricCatalog, Region, Station};
use crate::infrastructure::explanation_client::{ExplanationRequest, ExplanationResponse};
use crate::infrastructure::legacy_file::LegacyChartFile;
use crate::presentation::app_state::AppState;
use crate::presentation::error::AppError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

type ApiResult<T> = Result<Json<T>, AppError>;

#[derive(Deserialize)]
pub struct WindowQuery {
    pub window: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_regions(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Region>> {
    let regions = state
        .station_service
        .list_regions()
        .await
        .map_err(AppError::Upstream)?;
    Ok(Json(regions))
}

pub async fn list_stations(
    Path(region_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<Station>> {
    let stations = state
        .station_service
        .list_stations(&region_id)
        .await
        .map_err(AppError::Upstream)?;
    Ok(Json(stations))
}

pub async fn list_metrics(
    Path(station): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<MetricCatalog>> {
    let metrics = state
        .station_service
        .list_metrics(&station)
        .await
        .map_err(AppError::Upstream)?;
    Ok(Json(metrics))
}

/// Single station series, `?window=N` years back from its latest point
pub async fn station_series(
    Path((station, metric, sub_metric)): Path<(String, String, String)>,
    Query(query): Query<WindowQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StationSeries> {
    let window = match query.window.as_deref() {
        Some(raw) => raw.parse::<TimeWindow>().map_err(AppError::BadRequest)?,
        None => TimeWindow::All,
    };

    let series = state
        .station_service
        .station_series(&station, &metric, &sub_metric, window)
        .await
        .map_err(AppError::Upstream)?;
    Ok(Json(series))
}

/// Fetch, merge and analyse the requested series
pub async fn build_chart(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChartRequest>,
) -> ApiResult<ChartView> {
    if request.series.is_empty() {
        return Err(AppError::BadRequest("at least one series is required".to_string()));
    }
    Ok(Json(state.chart_service.build(request).await))
}

pub async fn explain_chart(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExplanationRequest>,
) -> ApiResult<ExplanationResponse> {
    let client = state
        .explanation
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("chart explanations are not configured".to_string()))?;

    let response = client.explain(&request).await.map_err(AppError::Upstream)?;
    Ok(Json(response))
}

pub async fn list_saved_charts(
    Path(owner_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<SavedChart>> {
    let charts = state
        .saved_charts
        .load_all(&owner_id)
        .await
        .map_err(AppError::Upstream)?;
    Ok(Json(charts))
}

pub async fn save_chart(
    Path(owner_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(chart): Json<NewChart>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if chart.name.trim().is_empty() {
        return Err(AppError::BadRequest("chart name must not be empty".to_string()));
    }
    let id = state
        .saved_charts
        .save(&owner_id, chart)
        .await
        .map_err(AppError::Upstream)?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn migrate_legacy_charts(
    Path(owner_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Value> {
    let legacy = LegacyChartFile::for_owner(&state.legacy_dir, &owner_id)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let migrated = state
        .saved_charts
        .migrate_legacy(&owner_id, &legacy)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(json!({ "migrated": migrated })))
}

pub async fn delete_chart(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    state
        .saved_charts
        .delete(&id)
        .await
        .map_err(AppError::Upstream)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chart_service::tests::FakeApi;
    use crate::application::chart_service::ChartService;
    use crate::application::saved_charts::SavedChartService;
    use crate::application::station_service::StationService;
    use crate::domain::series::{SeriesSelection, TemporalView};
    use crate::infrastructure::memory_store::MemoryChartStore;

    fn state() -> Arc<AppState> {
        state_with_legacy_dir(std::path::PathBuf::from("/nonexistent/observatorio/legacy"))
    }

    fn state_with_legacy_dir(legacy_dir: std::path::PathBuf) -> Arc<AppState> {
        let api = Arc::new(FakeApi::with(vec![(
            "Pudahuel",
            vec![("2023-01", 1.0), ("2023-02", 2.0)],
        )]));
        Arc::new(AppState {
            station_service: StationService::new(api.clone()),
            chart_service: ChartService::new(api),
            saved_charts: SavedChartService::new(Arc::new(MemoryChartStore::new())),
            explanation: None,
            legacy_dir,
        })
    }

    fn new_chart(name: &str) -> NewChart {
        NewChart {
            name: name.to_string(),
            series: Vec::new(),
            years_filter: None,
            temporal_view: TemporalView::Monthly,
        }
    }

    #[tokio::test]
    async fn test_save_list_delete() {
        let state = state();

        let (status, Json(body)) = save_chart(
            Path("ana".to_string()),
            State(state.clone()),
            Json(new_chart("Mi gráfico")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_str().unwrap().to_string();

        let Json(charts) = list_saved_charts(Path("ana".to_string()), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].id, id);

        let status = delete_chart(Path(id), State(state.clone())).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        let Json(charts) = list_saved_charts(Path("ana".to_string()), State(state))
            .await
            .unwrap();
        assert!(charts.is_empty());
    }

    #[tokio::test]
    async fn test_save_rejects_blank_name() {
        let err = save_chart(Path("ana".to_string()), State(state()), Json(new_chart("  ")))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_window_is_bad_request() {
        let err = station_series(
            Path(("Pudahuel".to_string(), "Temperatura".to_string(), "Media".to_string())),
            Query(WindowQuery {
                window: Some("diez".to_string()),
            }),
            State(state()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_build_chart() {
        let request = ChartRequest {
            series: vec![SeriesSelection {
                region_id: None,
                station: "Pudahuel".to_string(),
                metric: "Temperatura".to_string(),
                sub_metric: "Media".to_string(),
                color: None,
            }],
            years_filter: None,
            temporal_view: TemporalView::Monthly,
        };
        let Json(view) = build_chart(State(state()), Json(request)).await.unwrap();
        assert_eq!(view.rows.len(), 2);
        assert!(view.failed.is_empty());
    }

    #[tokio::test]
    async fn test_explain_without_client_is_unavailable() {
        let request = ExplanationRequest {
            chart_config: json!({}),
            data_points: json!([]),
            user_context: None,
        };
        let err = explain_chart(State(state()), Json(request)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_migrate_without_legacy_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_legacy_dir(dir.path().to_path_buf());
        let Json(body) = migrate_legacy_charts(Path("sin-datos".to_string()), State(state))
            .await
            .unwrap();
        assert_eq!(body["migrated"], 0);
    }

    #[tokio::test]
    async fn test_migrate_moves_only_the_owners_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("anab.json"),
            r#"[{"name": "Ajeno", "series": [], "temporalView": "monthly"}]"#,
        )
        .unwrap();
        let state = state_with_legacy_dir(dir.path().to_path_buf());

        let err = migrate_legacy_charts(Path("ana.b".to_string()), State(state.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(dir.path().join("anab.json").exists());

        let Json(body) = migrate_legacy_charts(Path("anab".to_string()), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(body["migrated"], 1);
        assert!(!dir.path().join("anab.json").exists());
        let Json(charts) = list_saved_charts(Path("anab".to_string()), State(state))
            .await
            .unwrap();
        assert_eq!(charts[0].chart.name, "Ajeno");
    }
}
