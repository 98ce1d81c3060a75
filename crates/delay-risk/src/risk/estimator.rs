use super::encoder::CategoricalEncoder;
use super::features::{
    FeatureAssembler, FeatureVector, InputError, ProjectInputs, FEATURE_COLUMNS,
};
use super::model::{ModelError, RiskModel};
use super::tier::RiskTier;
use crate::dataset::{CategoricalAttribute, ObservedRange, ProjectDataset};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_DURATION_MONTHS: u32 = 18;
pub const DEFAULT_TOTAL_COST: f64 = 1_500_000.0;

#[derive(Debug, thiserror::Error)]
pub enum EstimationError {
    #[error("invalid project input: {0}")]
    Input(#[from] InputError),
    #[error("failed to generate prediction: {0}")]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskEstimate {
    pub inputs: ProjectInputs,
    pub features: FeatureVector,
    pub delay_risk_pct: f64,
    pub display_value: String,
    pub tier: RiskTier,
    pub tier_label: &'static str,
    pub color: &'static str,
    pub evaluated_at: DateTime<Utc>,
}

/// Choices and bounds offered by the estimation form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFormOptions {
    pub construction_types: Vec<String>,
    pub materials: Vec<String>,
    pub climates: Vec<String>,
    pub duration_months: ObservedRange<u32>,
    pub total_cost: ObservedRange<f64>,
    pub default_duration_months: u32,
    pub default_total_cost: f64,
}

/// Runs encode, assemble, predict and classify against one loaded dataset and
/// model. Holds no mutable state; share it behind an `Arc`.
pub struct RiskEstimator {
    encoder: CategoricalEncoder,
    duration_range: ObservedRange<u32>,
    cost_range: ObservedRange<f64>,
    model: Arc<dyn RiskModel>,
}

impl fmt::Debug for RiskEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiskEstimator")
            .field("encoder", &self.encoder)
            .field("duration_range", &self.duration_range)
            .field("cost_range", &self.cost_range)
            .finish_non_exhaustive()
    }
}

impl RiskEstimator {
    pub fn new(dataset: &ProjectDataset, model: Arc<dyn RiskModel>) -> Self {
        if let Some(names) = model.feature_names() {
            if !names.iter().map(String::as_str).eq(FEATURE_COLUMNS) {
                warn!(
                    artifact_columns = ?names,
                    "model feature names differ from the assembled column order"
                );
            }
        }

        Self {
            encoder: CategoricalEncoder::for_dataset(dataset),
            duration_range: dataset.duration_range(),
            cost_range: dataset.cost_range(),
            model,
        }
    }

    pub fn assembler(&self) -> FeatureAssembler<'_> {
        FeatureAssembler::new(&self.encoder, self.duration_range, self.cost_range)
    }

    pub fn form_options(&self) -> RiskFormOptions {
        RiskFormOptions {
            construction_types: self
                .encoder
                .classes(CategoricalAttribute::ConstructionType)
                .to_vec(),
            materials: self.encoder.classes(CategoricalAttribute::Material).to_vec(),
            climates: self.encoder.classes(CategoricalAttribute::Climate).to_vec(),
            duration_months: self.duration_range,
            total_cost: self.cost_range,
            default_duration_months: self.duration_range.clamp(DEFAULT_DURATION_MONTHS),
            default_total_cost: self.cost_range.clamp(DEFAULT_TOTAL_COST),
        }
    }

    pub fn estimate(&self, inputs: ProjectInputs) -> Result<RiskEstimate, EstimationError> {
        let features = self.assembler().assemble(&inputs)?;
        let delay_risk_pct = self.model.predict(&features)?;
        let tier = RiskTier::classify(delay_risk_pct);

        debug!(
            construction_type = %inputs.construction_type,
            duration_months = inputs.duration_months,
            delay_risk_pct,
            tier = tier.label(),
            "delay risk estimated"
        );

        Ok(RiskEstimate {
            inputs,
            features,
            delay_risk_pct,
            display_value: format!("{delay_risk_pct:.2}%"),
            tier,
            tier_label: tier.label(),
            color: tier.color(),
            evaluated_at: Utc::now(),
        })
    }
}
