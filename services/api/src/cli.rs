use crate::commands::{run_dataset_summary, run_estimate, DatasetSummaryArgs, EstimateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use delay_risk::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Construction Delay Risk",
    about = "Explore construction project data and estimate the risk of delay",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Estimate the delay risk of a single project from the command line
    Estimate(EstimateArgs),
    /// Inspect the historical project dataset
    Dataset {
        #[command(subcommand)]
        command: DatasetCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DatasetCommand {
    /// Print a preview and the descriptive statistics of the dataset
    Summary(DatasetSummaryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

/// Artifact path overrides shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ArtifactArgs {
    /// Project dataset CSV (defaults to APP_DATASET_PATH)
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Trained model artifact (defaults to APP_MODEL_PATH)
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Estimate(args) => run_estimate(args),
        Command::Dataset {
            command: DatasetCommand::Summary(args),
        } => run_dataset_summary(args),
    }
}
