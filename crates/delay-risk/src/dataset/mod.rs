//! Historical construction project records and the statistics derived from them.

pub mod domain;
mod parser;
pub mod summary;

use std::io::Read;
use std::path::Path;

pub use domain::{CategoricalAttribute, ObservedRange, ProjectRecord};
pub use summary::{
    BoxSummary, CostBucket, DatasetSummary, DurationCostPoint, MaterialEfficiency,
};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read project dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid project CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("record {row} is invalid: {reason}")]
    InvalidRecord { row: usize, reason: String },
    #[error("project dataset contains no records")]
    Empty,
}

/// Immutable in-memory table of project records plus the numeric bounds
/// observed at load time.
#[derive(Debug, Clone)]
pub struct ProjectDataset {
    records: Vec<ProjectRecord>,
    duration_range: ObservedRange<u32>,
    cost_range: ObservedRange<f64>,
}

impl ProjectDataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let records = parser::parse_records(reader)?;
        Self::from_records(records)
    }

    /// Validates every record and computes the observed bounds. Row numbers in
    /// errors are 1-based and exclude the header.
    pub fn from_records(records: Vec<ProjectRecord>) -> Result<Self, DatasetError> {
        for (index, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|reason| DatasetError::InvalidRecord {
                    row: index + 1,
                    reason,
                })?;
        }

        let (first, rest) = records.split_first().ok_or(DatasetError::Empty)?;

        let mut duration_range = ObservedRange::single(first.duration_months);
        let mut cost_range = ObservedRange::single(first.total_cost);
        for record in rest {
            duration_range = duration_range.widen(record.duration_months);
            cost_range = cost_range.widen(record.total_cost);
        }

        Ok(Self {
            records,
            duration_range,
            cost_range,
        })
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn duration_range(&self) -> ObservedRange<u32> {
        self.duration_range
    }

    pub fn cost_range(&self) -> ObservedRange<f64> {
        self.cost_range
    }

    /// Raw textual values of a categorical column, in row order.
    pub fn column(&self, attribute: CategoricalAttribute) -> impl Iterator<Item = &str> + '_ {
        self.records
            .iter()
            .map(move |record| attribute.value_of(record))
    }

    pub fn preview(&self, rows: usize) -> &[ProjectRecord] {
        &self.records[..rows.min(self.records.len())]
    }

    pub fn summary(&self) -> DatasetSummary {
        summary::summarize(self)
    }
}
