use crate::cli::ArtifactArgs;
use delay_risk::artifacts::ArtifactSet;
use delay_risk::config::ArtifactConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) artifacts: Arc<ArtifactSet>,
}

pub(crate) fn apply_artifact_overrides(
    mut config: ArtifactConfig,
    overrides: ArtifactArgs,
) -> ArtifactConfig {
    if let Some(dataset) = overrides.dataset {
        config.dataset_path = dataset;
    }
    if let Some(model) = overrides.model {
        config.model_path = model;
    }
    config
}
