use crate::infra::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use delay_risk::dataset::summary::DEFAULT_PREVIEW_ROWS;
use delay_risk::dataset::{DatasetSummary, ProjectRecord};
use delay_risk::error::AppError;
use delay_risk::risk::{ProjectInputs, RiskEstimate, RiskFormOptions};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::Ordering;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PreviewQuery {
    #[serde(default)]
    pub(crate) rows: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DatasetPreviewResponse {
    pub(crate) total_records: usize,
    pub(crate) rows: Vec<ProjectRecord>,
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/dataset/preview", get(dataset_preview_endpoint))
        .route("/api/v1/dataset/summary", get(dataset_summary_endpoint))
        .route("/api/v1/risk/form", get(risk_form_endpoint))
        .route("/api/v1/risk/estimate", post(risk_estimate_endpoint))
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    if ready {
        return (StatusCode::OK, Json(json!({ "status": "ready" })));
    }

    let failures = state.artifacts.failures();
    let status = if failures.is_empty() {
        "initializing"
    } else {
        "degraded"
    };

    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "status": status, "failures": failures })),
    )
}

pub(crate) async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn dataset_preview_endpoint(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<DatasetPreviewResponse>, AppError> {
    let dataset = state.artifacts.dataset()?;
    let rows = query.rows.unwrap_or(DEFAULT_PREVIEW_ROWS);

    Ok(Json(DatasetPreviewResponse {
        total_records: dataset.len(),
        rows: dataset.preview(rows).to_vec(),
    }))
}

pub(crate) async fn dataset_summary_endpoint(
    State(state): State<AppState>,
) -> Result<Json<DatasetSummary>, AppError> {
    let dataset = state.artifacts.dataset()?;
    Ok(Json(dataset.summary()))
}

pub(crate) async fn risk_form_endpoint(
    State(state): State<AppState>,
) -> Result<Json<RiskFormOptions>, AppError> {
    let estimator = state.artifacts.estimator()?;
    Ok(Json(estimator.form_options()))
}

pub(crate) async fn risk_estimate_endpoint(
    State(state): State<AppState>,
    body: Result<Json<ProjectInputs>, JsonRejection>,
) -> Result<Json<RiskEstimate>, AppError> {
    let estimator = state.artifacts.estimator()?;
    let Json(inputs) = body?;
    let estimate = estimator.estimate(inputs).map_err(|err| {
        warn!(error = %err, "delay risk estimation failed");
        err
    })?;

    Ok(Json(estimate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use delay_risk::artifacts::{ArtifactError, ArtifactKind, ArtifactSet};
    use delay_risk::dataset::ProjectDataset;
    use delay_risk::risk::{LinearRiskModel, RiskModel};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    const DATASET: &str = "Proyecto,Tipo de Construcción,Duración (meses),Costo Total (€),Material Principal,Clima Predominante,Eficiencia (%),Satisfacción Cliente (1-5)\n\
P001,Residential,6,500000,Concrete,Arid,84.5,4.3\n\
P002,Commercial,36,4150000,Steel,Humid,71.4,3.2\n\
P003,Residential,18,1460000,Steel,Arid,80.1,4.0\n";

    fn model() -> Arc<dyn RiskModel> {
        // Returns duration_months, which keeps expected tiers easy to read.
        Arc::new(LinearRiskModel::new(
            Vec::new(),
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            0.0,
        ))
    }

    fn state_with(artifacts: ArtifactSet) -> AppState {
        let ready = artifacts.is_ready();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            artifacts: Arc::new(artifacts),
        }
    }

    fn loaded_state() -> AppState {
        let dataset = ProjectDataset::from_reader(Cursor::new(DATASET)).expect("dataset");
        state_with(ArtifactSet::from_parts(Ok(dataset), Ok(model())))
    }

    fn state_without_model() -> AppState {
        let dataset = ProjectDataset::from_reader(Cursor::new(DATASET)).expect("dataset");
        state_with(ArtifactSet::from_parts(
            Ok(dataset),
            Err(ArtifactError::Missing {
                kind: ArtifactKind::Model,
                path: PathBuf::from("data/delay_model.json"),
            }),
        ))
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(state).oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn estimate_request(payload: Value) -> Request<Body> {
        Request::post("/api/v1/risk/estimate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request")
    }

    fn payload(duration: u32, climate: &str) -> Value {
        json!({
            "construction_type": "Residential",
            "duration_months": duration,
            "total_cost": 1_500_000.0,
            "material": "Concrete",
            "climate": climate,
        })
    }

    #[tokio::test]
    async fn estimate_endpoint_returns_tier_and_color() {
        let (status, body) = send(loaded_state(), estimate_request(payload(18, "Arid"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tier"], "moderate");
        assert_eq!(body["color"], "orange");
        assert_eq!(body["display_value"], "18.00%");
        assert_eq!(
            body["features"],
            json!([0.0, 1.0, 18.0, 1_500_000.0, 0.0, 0.0, 80.0, 4.5])
        );
    }

    #[tokio::test]
    async fn unknown_category_is_reported_next_to_its_field() {
        let (status, body) = send(loaded_state(), estimate_request(payload(18, "Polar"))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "climate");
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("Polar"));
    }

    #[tokio::test]
    async fn numeric_input_errors_are_json_with_field() {
        for (duration, expected_status) in [
            (json!(-1), StatusCode::UNPROCESSABLE_ENTITY),
            (json!(18.5), StatusCode::UNPROCESSABLE_ENTITY),
            (json!(18.0), StatusCode::OK),
        ] {
            let mut body = payload(18, "Arid");
            body["duration_months"] = duration.clone();
            let (status, body) = send(loaded_state(), estimate_request(body)).await;

            assert_eq!(status, expected_status, "duration {duration}");
            if expected_status == StatusCode::UNPROCESSABLE_ENTITY {
                assert_eq!(body["field"], "duration_months", "duration {duration}");
            }
        }
    }

    #[tokio::test]
    async fn malformed_body_is_reported_as_json() {
        let mut body = payload(18, "Arid");
        body["duration_months"] = json!("eighteen");
        let (status, body) = send(loaded_state(), estimate_request(body)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .starts_with("invalid request"));
    }

    #[tokio::test]
    async fn missing_model_blocks_estimation_but_not_dataset_views() {
        let (status, body) =
            send(state_without_model(), estimate_request(payload(18, "Arid"))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["artifact"], "model");

        let request = Request::get("/api/v1/dataset/summary")
            .body(Body::empty())
            .expect("request");
        let (status, body) = send(state_without_model(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record_count"], 3);
    }

    #[tokio::test]
    async fn readiness_reports_degraded_artifacts() {
        let request = Request::get("/ready").body(Body::empty()).expect("request");
        let (status, body) = send(state_without_model(), request).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["failures"][0]["kind"], "model");
    }

    #[tokio::test]
    async fn form_and_preview_expose_dataset_domain() {
        let request = Request::get("/api/v1/risk/form")
            .body(Body::empty())
            .expect("request");
        let (status, body) = send(loaded_state(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["construction_types"], json!(["Commercial", "Residential"]));
        assert_eq!(body["duration_months"], json!({ "min": 6, "max": 36 }));
        assert_eq!(body["default_duration_months"], 18);

        let request = Request::get("/api/v1/dataset/preview?rows=2")
            .body(Body::empty())
            .expect("request");
        let (status, body) = send(loaded_state(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_records"], 3);
        assert_eq!(body["rows"].as_array().map(Vec::len), Some(2));
    }
}
