use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline and write the product, FAQ and comparison pages.
    Build(BuildArgs),
    /// Parse the input file and print the product record as JSON.
    Ingest(IngestArgs),
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Input product description (`Key: value` lines).
    #[arg(long)]
    pub input: Option<String>,

    /// YAML config file (input, output_dir, template_dir, competitor).
    #[arg(long)]
    pub config: Option<String>,
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Input product description (`Key: value` lines).
    #[arg(long)]
    pub input: Option<String>,

    /// YAML config file; only `input` is read.
    #[arg(long)]
    pub config: Option<String>,
}
