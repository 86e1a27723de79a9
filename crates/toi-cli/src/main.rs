use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use toi_cli::commands::{events, shared, timeline, util};
use toi_cli::{Cli, Commands, Config};
use toi_core::{GameSummary, PipelineConfig, process_game};

/// Load config and convert it into the pipeline configuration.
fn load_pipeline(config_path: Option<&Path>) -> Result<PipelineConfig> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    config.pipeline().context("invalid configuration")
}

/// Load and process a single game file.
fn summarize(path: &Path, pipeline: &PipelineConfig) -> Result<GameSummary> {
    let record = util::load_game(path)?;
    process_game(&record, pipeline).with_context(|| format!("failed to process {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Shared {
            files,
            json,
            min_seconds,
        }) => {
            let pipeline = load_pipeline(cli.config.as_deref())?;
            shared::run(&mut stdout, files, &pipeline, *json, *min_seconds)?;
        }
        Some(Commands::Events {
            file,
            suspect_only,
            json,
        }) => {
            let pipeline = load_pipeline(cli.config.as_deref())?;
            let summary = summarize(file, &pipeline)?;
            events::run(&mut stdout, &summary, *suspect_only, *json)?;
        }
        Some(Commands::Timeline { file }) => {
            let pipeline = load_pipeline(cli.config.as_deref())?;
            let summary = summarize(file, &pipeline)?;
            timeline::run(&mut stdout, &summary)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
