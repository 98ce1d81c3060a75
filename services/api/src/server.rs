use crate::cli::ServeArgs;
use crate::infra::{apply_artifact_overrides, AppState};
use crate::routes::router;
use axum_prometheus::PrometheusMetricLayer;
use delay_risk::artifacts::ArtifactSet;
use delay_risk::config::AppConfig;
use delay_risk::error::AppError;
use delay_risk::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    config.artifacts = apply_artifact_overrides(config.artifacts, args.artifacts);

    telemetry::init(&config.telemetry)?;

    let artifacts = Arc::new(ArtifactSet::load(&config.artifacts));
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        artifacts: artifacts.clone(),
    };

    let app = router(app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    if artifacts.is_ready() {
        readiness_flag.store(true, Ordering::Release);
    } else {
        warn!(
            failures = artifacts.failures().len(),
            "serving without all artifacts; affected endpoints will report errors"
        );
    }

    info!(?config.environment, %addr, "delay risk service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
