use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::DiskOverrides;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub input: PathBuf,
    pub root: PathBuf,
    pub overrides: DiskOverrides,
    pub dump_tree: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            input: cli.input,
            root: cli.root,
            overrides: DiskOverrides {
                threshold: cli.threshold,
                total_capacity: cli.total_capacity,
                required_free: cli.required_free,
            },
            dump_tree: !cli.no_dump,
        }
    }
}
