//! One-time loading of the project dataset and the trained model artifact.
//!
//! Both are read once and handed out as read-only handles; a missing file is
//! detected before any read so that no inference is ever attempted without a
//! model.

use crate::config::ArtifactConfig;
use crate::dataset::{DatasetError, ProjectDataset};
use crate::risk::{LinearRiskModel, ModelLoadError, RiskEstimator, RiskModel};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Dataset,
    Model,
}

impl ArtifactKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dataset => "project dataset",
            Self::Model => "risk model",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("{} not found at {}", .kind.label(), .path.display())]
    Missing { kind: ArtifactKind, path: PathBuf },
    #[error("could not load project dataset: {0}")]
    Dataset(#[from] DatasetError),
    #[error("could not load risk model: {0}")]
    Model(#[from] ModelLoadError),
}

impl ArtifactError {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Missing { kind, .. } => *kind,
            Self::Dataset(_) => ArtifactKind::Dataset,
            Self::Model(_) => ArtifactKind::Model,
        }
    }
}

fn ensure_present(kind: ArtifactKind, path: &Path) -> Result<(), ArtifactError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ArtifactError::Missing {
            kind,
            path: path.to_path_buf(),
        })
    }
}

pub fn load_dataset(path: &Path) -> Result<ProjectDataset, ArtifactError> {
    ensure_present(ArtifactKind::Dataset, path)?;
    let dataset = ProjectDataset::from_path(path)?;
    info!(path = %path.display(), records = dataset.len(), "project dataset loaded");
    Ok(dataset)
}

pub fn load_model(path: &Path) -> Result<LinearRiskModel, ArtifactError> {
    ensure_present(ArtifactKind::Model, path)?;
    let model = LinearRiskModel::from_path(path)?;
    info!(
        path = %path.display(),
        coefficients = model.coefficients().len(),
        "risk model loaded"
    );
    Ok(model)
}

/// Loads both artifacts and fails on the first problem.
pub fn load_estimator(config: &ArtifactConfig) -> Result<RiskEstimator, ArtifactError> {
    let dataset = load_dataset(&config.dataset_path)?;
    let model = load_model(&config.model_path)?;
    Ok(RiskEstimator::new(&dataset, Arc::new(model)))
}

/// User-facing description of an artifact that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactFailure {
    pub kind: ArtifactKind,
    pub message: String,
}

impl From<&ArtifactError> for ArtifactFailure {
    fn from(error: &ArtifactError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ArtifactFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Loaded handles for every surface of the service. Each half fails
/// independently so dataset views keep working when only the model is absent.
pub struct ArtifactSet {
    dataset: Result<Arc<ProjectDataset>, ArtifactFailure>,
    estimator: Result<Arc<RiskEstimator>, ArtifactFailure>,
}

impl ArtifactSet {
    pub fn load(config: &ArtifactConfig) -> Self {
        let dataset = load_dataset(&config.dataset_path);
        let model = load_model(&config.model_path)
            .map(|model| Arc::new(model) as Arc<dyn RiskModel>);

        for failure in [dataset.as_ref().err(), model.as_ref().err()]
            .into_iter()
            .flatten()
        {
            error!(kind = failure.kind().label(), error = %failure, "artifact unavailable");
        }

        Self::from_parts(dataset, model)
    }

    pub fn from_parts(
        dataset: Result<ProjectDataset, ArtifactError>,
        model: Result<Arc<dyn RiskModel>, ArtifactError>,
    ) -> Self {
        let dataset = dataset
            .map(Arc::new)
            .map_err(|error| ArtifactFailure::from(&error));

        let estimator = match (&dataset, model) {
            (Ok(dataset), Ok(model)) => Ok(Arc::new(RiskEstimator::new(dataset, model))),
            (Err(failure), _) => Err(failure.clone()),
            (Ok(_), Err(error)) => Err(ArtifactFailure::from(&error)),
        };

        Self { dataset, estimator }
    }

    pub fn dataset(&self) -> Result<&ProjectDataset, ArtifactFailure> {
        self.dataset.as_deref().map_err(Clone::clone)
    }

    pub fn estimator(&self) -> Result<&RiskEstimator, ArtifactFailure> {
        self.estimator.as_deref().map_err(Clone::clone)
    }

    pub fn is_ready(&self) -> bool {
        self.dataset.is_ok() && self.estimator.is_ok()
    }

    pub fn failures(&self) -> Vec<ArtifactFailure> {
        let mut failures: Vec<ArtifactFailure> = Vec::new();
        for failure in [self.dataset.as_ref().err(), self.estimator.as_ref().err()]
            .into_iter()
            .flatten()
        {
            if !failures.contains(failure) {
                failures.push(failure.clone());
            }
        }
        failures
    }
}
