use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use crease_engine::RankingCategory;

#[derive(Parser)]
#[command(
    name = "crease",
    about = "crease: ball-by-ball cricket scoring engine",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Engine configuration (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Play a match script and print the scorecards
    Score(ScoreArgs),
    /// Play a random match
    Simulate(SimulateArgs),
    /// Play a match script and rank its players
    Rankings(RankingsArgs),
    /// Play a match script and check every innings ledger
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct ScoreArgs {
    pub script: PathBuf,
    /// Print each committed change as it is published
    #[arg(long)]
    pub commentary: bool,
}

#[derive(Args)]
pub struct SimulateArgs {
    #[arg(long, default_value = "5")]
    pub overs: u32,
    #[arg(long, default_value = "42")]
    pub seed: u64,
    /// Players per side
    #[arg(long, default_value = "11")]
    pub players: u32,
}

#[derive(Args)]
pub struct RankingsArgs {
    pub script: PathBuf,
    #[arg(long, default_value = "runs")]
    pub category: RankingCategory,
    /// Defaults to the configured ranking limit
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct VerifyArgs {
    pub script: PathBuf,
}
