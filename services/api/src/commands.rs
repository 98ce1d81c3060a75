use crate::cli::ArtifactArgs;
use crate::infra::apply_artifact_overrides;
use clap::Args;
use delay_risk::artifacts;
use delay_risk::config::AppConfig;
use delay_risk::dataset::summary::DEFAULT_PREVIEW_ROWS;
use delay_risk::dataset::ProjectDataset;
use delay_risk::error::AppError;
use delay_risk::risk::{ProjectInputs, RiskEstimate};

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Construction type, as spelled in the dataset
    #[arg(long)]
    pub(crate) construction_type: String,
    /// Planned duration in months
    #[arg(long)]
    pub(crate) duration: u32,
    /// Total cost in euros
    #[arg(long)]
    pub(crate) cost: f64,
    /// Primary material, as spelled in the dataset
    #[arg(long)]
    pub(crate) material: String,
    /// Dominant climate, as spelled in the dataset
    #[arg(long)]
    pub(crate) climate: String,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

#[derive(Args, Debug)]
pub(crate) struct DatasetSummaryArgs {
    /// Number of records to preview
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub(crate) rows: usize,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let EstimateArgs {
        construction_type,
        duration,
        cost,
        material,
        climate,
        artifacts: overrides,
    } = args;

    let config = AppConfig::load()?;
    let artifact_config = apply_artifact_overrides(config.artifacts, overrides);
    let estimator = artifacts::load_estimator(&artifact_config)?;

    let estimate = estimator.estimate(ProjectInputs {
        construction_type,
        duration_months: f64::from(duration),
        total_cost: cost,
        material,
        climate,
    })?;

    render_estimate(&estimate);
    Ok(())
}

pub(crate) fn run_dataset_summary(args: DatasetSummaryArgs) -> Result<(), AppError> {
    let DatasetSummaryArgs {
        rows,
        artifacts: overrides,
    } = args;

    let config = AppConfig::load()?;
    let artifact_config = apply_artifact_overrides(config.artifacts, overrides);
    let dataset = artifacts::load_dataset(&artifact_config.dataset_path)?;

    render_dataset_summary(&dataset, rows);
    Ok(())
}

fn render_estimate(estimate: &RiskEstimate) {
    let inputs = &estimate.inputs;

    println!("Delay risk estimate");
    println!(
        "Project: {} | {} months | {:.0} EUR | {} | {}",
        inputs.construction_type,
        inputs.duration_months,
        inputs.total_cost,
        inputs.material,
        inputs.climate
    );

    println!("\nModel inputs");
    for (column, value) in estimate.features.named() {
        println!("- {column}: {value}");
    }

    println!(
        "\nEstimated delay risk: {} ({} risk, {})",
        estimate.display_value, estimate.tier_label, estimate.color
    );
}

fn render_dataset_summary(dataset: &ProjectDataset, rows: usize) {
    let summary = dataset.summary();

    println!("Construction project dataset");
    println!(
        "{} records | duration {}-{} months | cost {:.0}-{:.0} EUR",
        summary.record_count,
        summary.duration_range.min,
        summary.duration_range.max,
        summary.cost_range.min,
        summary.cost_range.max
    );

    println!("\nPreview");
    for record in dataset.preview(rows) {
        println!(
            "- {} | {} | {} months | {:.0} EUR | {} | {} | {:.1}% | {:.1}/5",
            record.project_id,
            record.construction_type,
            record.duration_months,
            record.total_cost,
            record.material,
            record.climate,
            record.efficiency_pct,
            record.client_satisfaction
        );
    }

    println!("\nCost distribution");
    for bucket in &summary.cost_histogram {
        println!(
            "- {:>9.0} - {:>9.0} EUR: {}",
            bucket.lower,
            bucket.upper,
            "#".repeat(bucket.count)
        );
    }

    println!("\nEfficiency by material");
    for entry in &summary.efficiency_by_material {
        let stats = entry.efficiency;
        println!(
            "- {} ({} projects): min {:.1}, q1 {:.1}, median {:.1}, q3 {:.1}, max {:.1}",
            entry.material, entry.projects, stats.min, stats.q1, stats.median, stats.q3, stats.max
        );
    }
}
