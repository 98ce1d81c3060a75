//! Construction delay-risk core: project dataset loading, categorical encoding,
//! feature assembly, model inference and risk-tier classification.

pub mod artifacts;
pub mod config;
pub mod dataset;
pub mod error;
pub mod risk;
pub mod telemetry;
