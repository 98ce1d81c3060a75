use serde::{Deserialize, Serialize};

/// Textual project attributes that are label-encoded before inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalAttribute {
    ConstructionType,
    Material,
    Climate,
}

impl CategoricalAttribute {
    pub const fn ordered() -> [Self; 3] {
        [Self::ConstructionType, Self::Material, Self::Climate]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ConstructionType => "construction type",
            Self::Material => "primary material",
            Self::Climate => "dominant climate",
        }
    }

    pub fn value_of(self, record: &ProjectRecord) -> &str {
        match self {
            Self::ConstructionType => &record.construction_type,
            Self::Material => &record.material,
            Self::Climate => &record.climate,
        }
    }
}

/// One historical construction project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub project_id: String,
    pub construction_type: String,
    pub duration_months: u32,
    pub total_cost: f64,
    pub material: String,
    pub climate: String,
    pub efficiency_pct: f64,
    pub client_satisfaction: f64,
}

impl ProjectRecord {
    /// Checks the attributes every record must carry: non-blank text,
    /// non-negative finite numbers and a 1-5 satisfaction score.
    pub fn validate(&self) -> Result<(), String> {
        require_text("project id", &self.project_id)?;
        for attribute in CategoricalAttribute::ordered() {
            require_text(attribute.label(), attribute.value_of(self))?;
        }
        require_non_negative("total cost", self.total_cost)?;
        require_non_negative("efficiency", self.efficiency_pct)?;
        require_non_negative("client satisfaction", self.client_satisfaction)?;

        if !(1.0..=5.0).contains(&self.client_satisfaction) {
            return Err(format!(
                "client satisfaction must be between 1 and 5, got {}",
                self.client_satisfaction
            ));
        }

        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} is empty"))
    } else {
        Ok(())
    }
}

fn require_non_negative(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{field} must be a non-negative number, got {value}"))
    }
}

/// Inclusive `[min, max]` bounds observed for a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObservedRange<T> {
    pub min: T,
    pub max: T,
}

impl<T> ObservedRange<T>
where
    T: PartialOrd + Copy,
{
    pub fn single(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub(crate) fn widen(self, value: T) -> Self {
        Self {
            min: if value < self.min { value } else { self.min },
            max: if value > self.max { value } else { self.max },
        }
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}
