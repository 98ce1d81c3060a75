use super::encoder::{CategoricalEncoder, EncodingError};
use crate::dataset::{CategoricalAttribute, ObservedRange, ProjectDataset};
use serde::{Deserialize, Serialize};

pub const FEATURE_COUNT: usize = 8;

/// Column order the regression model was trained with.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "Proyecto",
    "Tipo de Construcción",
    "Duración (meses)",
    "Costo Total (€)",
    "Material Principal",
    "Clima Predominante",
    "Eficiencia (%)",
    "Satisfacción Cliente (1-5)",
];

// The form does not collect these three columns; predictions therefore do not
// react to real efficiency or satisfaction values.
pub const PROJECT_ID_PLACEHOLDER: f64 = 0.0;
pub const EFFICIENCY_PLACEHOLDER: f64 = 80.0;
pub const SATISFACTION_PLACEHOLDER: f64 = 4.5;

/// Values a user selects on the estimation form. Numbers arrive as JSON
/// numbers; the assembler decides whether they are usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInputs {
    pub construction_type: String,
    pub duration_months: f64,
    pub total_cost: f64,
    pub material: String,
    pub climate: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    ConstructionType,
    DurationMonths,
    TotalCost,
    Material,
    Climate,
}

impl InputField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ConstructionType => "construction type",
            Self::DurationMonths => "duration (months)",
            Self::TotalCost => "total cost",
            Self::Material => "primary material",
            Self::Climate => "dominant climate",
        }
    }
}

impl From<CategoricalAttribute> for InputField {
    fn from(attribute: CategoricalAttribute) -> Self {
        match attribute {
            CategoricalAttribute::ConstructionType => Self::ConstructionType,
            CategoricalAttribute::Material => Self::Material,
            CategoricalAttribute::Climate => Self::Climate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error("{} must be between {min} and {max}, got {value}", .field.label())]
    OutOfRange {
        field: InputField,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("duration (months) must be a whole number, got {value}")]
    FractionalMonths { value: f64 },
}

impl InputError {
    /// Form field the error should be reported next to.
    pub fn field(&self) -> InputField {
        match self {
            Self::Encoding(error) => error.attribute().into(),
            Self::OutOfRange { field, .. } => *field,
            Self::FractionalMonths { .. } => InputField::DurationMonths,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Pairs each value with its training-time column name.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_COLUMNS.into_iter().zip(self.0.iter().copied())
    }
}

/// Builds model input vectors from form values, the dataset's code tables and
/// the dataset's observed numeric bounds.
#[derive(Debug, Clone, Copy)]
pub struct FeatureAssembler<'a> {
    encoder: &'a CategoricalEncoder,
    duration_range: ObservedRange<u32>,
    cost_range: ObservedRange<f64>,
}

impl<'a> FeatureAssembler<'a> {
    pub fn new(
        encoder: &'a CategoricalEncoder,
        duration_range: ObservedRange<u32>,
        cost_range: ObservedRange<f64>,
    ) -> Self {
        Self {
            encoder,
            duration_range,
            cost_range,
        }
    }

    pub fn for_dataset(encoder: &'a CategoricalEncoder, dataset: &ProjectDataset) -> Self {
        Self::new(encoder, dataset.duration_range(), dataset.cost_range())
    }

    pub fn assemble(&self, inputs: &ProjectInputs) -> Result<FeatureVector, InputError> {
        let construction_type = self
            .encoder
            .encode(CategoricalAttribute::ConstructionType, &inputs.construction_type)?;

        let duration_range = ObservedRange {
            min: f64::from(self.duration_range.min),
            max: f64::from(self.duration_range.max),
        };
        if !duration_range.contains(inputs.duration_months) {
            return Err(InputError::OutOfRange {
                field: InputField::DurationMonths,
                value: inputs.duration_months,
                min: duration_range.min,
                max: duration_range.max,
            });
        }
        if inputs.duration_months.fract() != 0.0 {
            return Err(InputError::FractionalMonths {
                value: inputs.duration_months,
            });
        }

        if !self.cost_range.contains(inputs.total_cost) {
            return Err(InputError::OutOfRange {
                field: InputField::TotalCost,
                value: inputs.total_cost,
                min: self.cost_range.min,
                max: self.cost_range.max,
            });
        }

        let material = self
            .encoder
            .encode(CategoricalAttribute::Material, &inputs.material)?;
        let climate = self
            .encoder
            .encode(CategoricalAttribute::Climate, &inputs.climate)?;

        Ok(FeatureVector([
            PROJECT_ID_PLACEHOLDER,
            construction_type as f64,
            inputs.duration_months,
            inputs.total_cost,
            material as f64,
            climate as f64,
            EFFICIENCY_PLACEHOLDER,
            SATISFACTION_PLACEHOLDER,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ProjectRecord;

    fn record(
        kind: &str,
        duration: u32,
        cost: f64,
        material: &str,
        climate: &str,
    ) -> ProjectRecord {
        ProjectRecord {
            project_id: format!("{kind}-{duration}"),
            construction_type: kind.to_string(),
            duration_months: duration,
            total_cost: cost,
            material: material.to_string(),
            climate: climate.to_string(),
            efficiency_pct: 78.0,
            client_satisfaction: 4.0,
        }
    }

    fn dataset() -> ProjectDataset {
        ProjectDataset::from_records(vec![
            record("Residential", 6, 500_000.0, "Concrete", "Humid"),
            record("Commercial", 36, 4_150_000.0, "Steel", "Arid"),
            record("Residential", 20, 1_800_000.0, "Steel", "Arid"),
        ])
        .expect("dataset")
    }

    fn inputs() -> ProjectInputs {
        ProjectInputs {
            construction_type: "Residential".to_string(),
            duration_months: 18.0,
            total_cost: 1_500_000.0,
            material: "Concrete".to_string(),
            climate: "Arid".to_string(),
        }
    }

    #[test]
    fn assembles_vector_in_training_order() {
        let dataset = dataset();
        let encoder = CategoricalEncoder::for_dataset(&dataset);
        let assembler = FeatureAssembler::for_dataset(&encoder, &dataset);

        let vector = assembler.assemble(&inputs()).expect("assembles");

        assert_eq!(
            vector.values(),
            &[0.0, 1.0, 18.0, 1_500_000.0, 0.0, 0.0, 80.0, 4.5]
        );
        let names: Vec<&str> = vector.named().map(|(name, _)| name).collect();
        assert_eq!(names, FEATURE_COLUMNS);
    }

    #[test]
    fn assembling_twice_is_identical() {
        let dataset = dataset();
        let encoder = CategoricalEncoder::for_dataset(&dataset);
        let assembler = FeatureAssembler::for_dataset(&encoder, &dataset);

        let first = assembler.assemble(&inputs()).expect("first");
        let second = assembler.assemble(&inputs()).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn bounds_are_inclusive() {
        let dataset = dataset();
        let encoder = CategoricalEncoder::for_dataset(&dataset);
        let assembler = FeatureAssembler::for_dataset(&encoder, &dataset);

        for (duration, cost) in [(6.0, 500_000.0), (36.0, 4_150_000.0)] {
            let inputs = ProjectInputs {
                duration_months: duration,
                total_cost: cost,
                ..inputs()
            };
            assert!(assembler.assemble(&inputs).is_ok());
        }
    }

    #[test]
    fn rejects_values_outside_observed_range() {
        let dataset = dataset();
        let encoder = CategoricalEncoder::for_dataset(&dataset);
        let assembler = FeatureAssembler::for_dataset(&encoder, &dataset);

        let too_long = ProjectInputs {
            duration_months: 37.0,
            ..inputs()
        };
        let error = assembler.assemble(&too_long).expect_err("duration above max");
        assert_eq!(error.field(), InputField::DurationMonths);

        for duration in [-1.0, f64::INFINITY] {
            let inputs = ProjectInputs {
                duration_months: duration,
                ..inputs()
            };
            let error = assembler.assemble(&inputs).expect_err("duration rejected");
            assert!(matches!(
                error,
                InputError::OutOfRange {
                    field: InputField::DurationMonths,
                    ..
                }
            ));
        }

        let nan_cost = ProjectInputs {
            total_cost: f64::NAN,
            ..inputs()
        };
        let error = assembler.assemble(&nan_cost).expect_err("nan cost");
        assert_eq!(error.field(), InputField::TotalCost);
    }

    #[test]
    fn duration_must_be_whole_months() {
        let dataset = dataset();
        let encoder = CategoricalEncoder::for_dataset(&dataset);
        let assembler = FeatureAssembler::for_dataset(&encoder, &dataset);

        let half_month = ProjectInputs {
            duration_months: 18.5,
            ..inputs()
        };
        let error = assembler.assemble(&half_month).expect_err("fractional duration");
        assert_eq!(error, InputError::FractionalMonths { value: 18.5 });
        assert_eq!(error.field(), InputField::DurationMonths);
    }

    #[test]
    fn unknown_category_names_the_offending_field() {
        let dataset = dataset();
        let encoder = CategoricalEncoder::for_dataset(&dataset);
        let assembler = FeatureAssembler::for_dataset(&encoder, &dataset);

        let inputs = ProjectInputs {
            climate: "Polar".to_string(),
            ..inputs()
        };
        let error = assembler.assemble(&inputs).expect_err("unknown climate");

        assert_eq!(error.field(), InputField::Climate);
        assert!(matches!(
            error,
            InputError::Encoding(EncodingError::UnknownCategory { .. })
        ));
    }
}
