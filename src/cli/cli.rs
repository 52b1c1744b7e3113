use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Rebuilds a directory tree from a shell transcript and reports its sizes")]
pub struct Cli {
    /// Transcript to replay
    #[clap(default_value = "input.txt")]
    pub input: PathBuf,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Directory searched for dirtally.yaml
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,

    /// Largest directory size counted in the small directory total
    #[clap(long)]
    pub threshold: Option<u64>,
    #[clap(long)]
    pub total_capacity: Option<u64>,
    #[clap(long)]
    pub required_free: Option<u64>,

    /// Skip printing the rebuilt tree
    #[clap(long)]
    pub no_dump: bool,
}
