use serde::{Deserialize, Serialize};

/// Predictions strictly below this value are low risk.
pub const MODERATE_RISK_THRESHOLD: f64 = 10.0;
/// Predictions at or above this value are high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Moderate, Self::High]
    }

    /// Total over every `f64`: values are not clamped to a percentage range,
    /// and NaN lands in `High`.
    pub fn classify(delay_pct: f64) -> Self {
        if delay_pct < MODERATE_RISK_THRESHOLD {
            Self::Low
        } else if delay_pct < HIGH_RISK_THRESHOLD {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Moderate => "orange",
            Self::High => "red",
        }
    }
}
