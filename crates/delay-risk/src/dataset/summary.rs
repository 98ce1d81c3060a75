use super::domain::ObservedRange;
use super::ProjectDataset;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_COST_BINS: usize = 10;
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationCostPoint {
    pub duration_months: u32,
    pub total_cost: f64,
    pub construction_type: String,
}

/// Five-number summary used by box plots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialEfficiency {
    pub material: String,
    pub projects: usize,
    pub efficiency: BoxSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub record_count: usize,
    pub duration_range: ObservedRange<u32>,
    pub cost_range: ObservedRange<f64>,
    pub cost_histogram: Vec<CostBucket>,
    pub duration_cost: Vec<DurationCostPoint>,
    pub efficiency_by_material: Vec<MaterialEfficiency>,
}

pub(crate) fn summarize(dataset: &ProjectDataset) -> DatasetSummary {
    DatasetSummary {
        record_count: dataset.len(),
        duration_range: dataset.duration_range(),
        cost_range: dataset.cost_range(),
        cost_histogram: cost_histogram(dataset, DEFAULT_COST_BINS),
        duration_cost: duration_cost_points(dataset),
        efficiency_by_material: efficiency_by_material(dataset),
    }
}

/// Equal-width buckets over the observed cost range; the last bucket includes
/// the maximum.
pub fn cost_histogram(dataset: &ProjectDataset, bins: usize) -> Vec<CostBucket> {
    if bins == 0 || dataset.is_empty() {
        return Vec::new();
    }

    let range = dataset.cost_range();
    let width = (range.max - range.min) / bins as f64;
    if width <= 0.0 {
        return vec![CostBucket {
            lower: range.min,
            upper: range.max,
            count: dataset.len(),
        }];
    }

    let mut buckets: Vec<CostBucket> = (0..bins)
        .map(|index| CostBucket {
            lower: range.min + width * index as f64,
            upper: if index + 1 == bins {
                range.max
            } else {
                range.min + width * (index + 1) as f64
            },
            count: 0,
        })
        .collect();

    for record in dataset.records() {
        let offset = ((record.total_cost - range.min) / width).floor() as usize;
        buckets[offset.min(bins - 1)].count += 1;
    }

    buckets
}

pub fn duration_cost_points(dataset: &ProjectDataset) -> Vec<DurationCostPoint> {
    dataset
        .records()
        .iter()
        .map(|record| DurationCostPoint {
            duration_months: record.duration_months,
            total_cost: record.total_cost,
            construction_type: record.construction_type.clone(),
        })
        .collect()
}

pub fn efficiency_by_material(dataset: &ProjectDataset) -> Vec<MaterialEfficiency> {
    let mut grouped: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for record in dataset.records() {
        grouped
            .entry(record.material.as_str())
            .or_default()
            .push(record.efficiency_pct);
    }

    grouped
        .into_iter()
        .filter_map(|(material, mut values)| {
            values.sort_by(f64::total_cmp);
            box_summary(&values).map(|efficiency| MaterialEfficiency {
                material: material.to_string(),
                projects: values.len(),
                efficiency,
            })
        })
        .collect()
}

/// Expects `sorted` in ascending order.
fn box_summary(sorted: &[f64]) -> Option<BoxSummary> {
    let (&min, &max) = (sorted.first()?, sorted.last()?);
    Some(BoxSummary {
        min,
        q1: quantile(sorted, 0.25),
        median: quantile(sorted, 0.5),
        q3: quantile(sorted, 0.75),
        max,
    })
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
