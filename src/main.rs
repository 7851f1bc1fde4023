use std::path::Path;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use productpages::cli::{BuildArgs, Command, IngestArgs};
use productpages::config::PipelineConfig;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    productpages::logging::init().context("init logging")?;

    let cli = productpages::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Build(args) => build(args).context("build")?,
        Command::Ingest(args) => ingest(args).context("ingest")?,
    }

    Ok(())
}

fn build(args: BuildArgs) -> anyhow::Result<()> {
    let config = PipelineConfig::resolve(
        args.config.as_deref().map(Path::new),
        args.input.as_deref().map(Path::new),
    )?;
    let report = productpages::pipeline::run(&config)?;
    tracing::info!(product = %report.product_name, "pipeline complete");
    Ok(())
}

fn ingest(args: IngestArgs) -> anyhow::Result<()> {
    let config = PipelineConfig::resolve(
        args.config.as_deref().map(Path::new),
        args.input.as_deref().map(Path::new),
    )?;
    let product = productpages::ingest::ingest(&config.input)?;
    let json = serde_json::to_string_pretty(&product).context("serialize product")?;
    println!("{json}");
    Ok(())
}
