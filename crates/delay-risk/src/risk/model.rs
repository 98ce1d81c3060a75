use super::features::FeatureVector;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Pre-trained regressor returning the delay-risk percentage for one vector.
pub trait RiskModel: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError>;

    /// Column names recorded at training time, when the artifact carries them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}

/// Failure raised while running inference.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("model expects {expected} features, received {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),
    #[error("model failure: {0}")]
    Internal(String),
}

/// Failure raised while reading a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid model artifact: {0}")]
    Format(#[from] serde_json::Error),
    #[error("unsupported model kind '{0}'")]
    UnsupportedKind(String),
    #[error("model artifact lists {names} feature names but {coefficients} coefficients")]
    Inconsistent { names: usize, coefficients: usize },
}

const LINEAR_REGRESSION_KIND: &str = "linear_regression";

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    kind: String,
    #[serde(default)]
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Ordinary least-squares model exported as coefficients plus intercept.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRiskModel {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRiskModel {
    pub fn new(feature_names: Vec<String>, coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            feature_names,
            coefficients,
            intercept,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelLoadError> {
        let artifact: ModelArtifact = serde_json::from_reader(reader)?;

        if artifact.kind != LINEAR_REGRESSION_KIND {
            return Err(ModelLoadError::UnsupportedKind(artifact.kind));
        }

        if !artifact.feature_names.is_empty()
            && artifact.feature_names.len() != artifact.coefficients.len()
        {
            return Err(ModelLoadError::Inconsistent {
                names: artifact.feature_names.len(),
                coefficients: artifact.coefficients.len(),
            });
        }

        Ok(Self::new(
            artifact.feature_names,
            artifact.coefficients,
            artifact.intercept,
        ))
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl RiskModel for LinearRiskModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let values = features.as_slice();
        if values.len() != self.coefficients.len() {
            return Err(ModelError::ShapeMismatch {
                expected: self.coefficients.len(),
                actual: values.len(),
            });
        }

        let prediction = self.intercept
            + values
                .iter()
                .zip(&self.coefficients)
                .map(|(value, weight)| value * weight)
                .sum::<f64>();

        if prediction.is_finite() {
            Ok(prediction)
        } else {
            Err(ModelError::NonFinite(prediction))
        }
    }

    fn feature_names(&self) -> Option<&[String]> {
        if self.feature_names.is_empty() {
            None
        } else {
            Some(&self.feature_names)
        }
    }
}
