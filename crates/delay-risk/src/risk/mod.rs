//! Delay-risk estimation: categorical encoding, feature assembly, model
//! inference and tier classification.

pub mod encoder;
pub mod estimator;
pub mod features;
pub mod model;
pub mod tier;

pub use encoder::{CategoricalEncoder, CategoryCodeTable, EncodingError};
pub use estimator::{EstimationError, RiskEstimate, RiskEstimator, RiskFormOptions};
pub use features::{
    FeatureAssembler, FeatureVector, InputError, InputField, ProjectInputs, FEATURE_COLUMNS,
};
pub use model::{LinearRiskModel, ModelError, ModelLoadError, RiskModel};
pub use tier::RiskTier;
