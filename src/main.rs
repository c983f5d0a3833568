//! Command-line entry point: run one pipeline stage, or all of them in order.

use clap::{Parser, Subcommand};
use climate_pain::{
    merge_all_data, process_weather, run_all, run_mixed_stage, run_residual_stage,
    PipelineConfig, PipelineError,
};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "climate_pain")]
#[command(about = "Link gridded climate data to chronic-pain outcomes and fit models", long_about = None)]
struct Cli {
    /// Directory holding the shapefile, NetCDF archives and health CSV
    #[arg(long, global = true, default_value = climate_pain::config::DEFAULT_RAW_DIR)]
    raw_dir: PathBuf,

    /// Directory for seasonal aggregates and the merged dataset
    #[arg(long, global = true, default_value = climate_pain::config::DEFAULT_PROCESSED_DIR)]
    processed_dir: PathBuf,

    /// Directory under which model and residual summaries are written
    #[arg(long, global = true, default_value = climate_pain::config::DEFAULT_RESULTS_DIR)]
    results_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract centroid climate series and write seasonal means (requires a build with `--features netcdf`)
    ProcessWeather,
    /// Left-join seasonal means onto the health dataset
    Merge,
    /// Fit mixed-effects models and write their summaries
    MixedModels,
    /// Fit residual models and write their summaries
    Residuals,
    /// Run every stage in order
    All,
}

fn main() -> Result<(), PipelineError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = PipelineConfig::builder()
        .raw_dir(cli.raw_dir)
        .processed_dir(cli.processed_dir)
        .results_dir(cli.results_dir)
        .build();

    match cli.command {
        Commands::ProcessWeather => {
            let seasonal = process_weather(&config)?;
            info!("Wrote {} seasonal tables", seasonal.len());
        }
        Commands::Merge => {
            merge_all_data(&config)?;
        }
        Commands::MixedModels => {
            run_mixed_stage(&config)?;
        }
        Commands::Residuals => {
            run_residual_stage(&config)?;
        }
        Commands::All => run_all(&config)?,
    }
    Ok(())
}
