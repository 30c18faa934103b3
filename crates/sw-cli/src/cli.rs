use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "shiftwatch",
    about = "Shiftwatch: detect drift between local reference copies and their remote counterparts",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Format of results printed on stdout (logs always go to stderr)
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Remote prefix, overriding the configuration file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Directory of local reference copies, overriding the configuration file
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run cycles forever, sleeping the configured interval between them
    Watch(WatchArgs),
    /// Run a single cycle
    Check(CheckArgs),
    /// Replace local reference copies with the current remote versions
    Baseline(BaselineArgs),
    /// Print content fingerprints and their combined digest
    Fingerprint(FingerprintArgs),
}

#[derive(Args)]
pub struct WatchArgs {
    /// Fetch baselines before the first cycle
    #[arg(long)]
    pub baseline: bool,
    /// Minutes between cycles
    #[arg(long)]
    pub interval: Option<u64>,
}

#[derive(Args)]
pub struct CheckArgs {}

#[derive(Args)]
pub struct BaselineArgs {}

#[derive(Args)]
pub struct FingerprintArgs {
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}
