use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::aggregate::{
    DeletionError, SmallDirectoriesError, minimum_deletable_size, small_directories_total,
};
use crate::application::RuntimeConfig;
use crate::application::report::{Report, TreeDump};
use crate::config::{DiskConfig, DiskConfigError};
use crate::transcript::{Transcript, TranscriptError};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let disk = DiskConfig::read(&app_config.root)
            .await
            .context(DiskConfigSnafu)?
            .with_overrides(&app_config.overrides);
        debug!("Using disk parameters: {:?}", disk);

        let transcript = Transcript::read(&app_config.input)
            .await
            .context(TranscriptSnafu)?;
        let output = Self::render(&transcript, &disk, app_config.dump_tree)?;
        println!("{output}");

        Ok(())
    }

    /// Replays the transcript and renders everything that goes to stdout.
    pub fn render(
        transcript: &Transcript,
        disk: &DiskConfig,
        dump_tree: bool,
    ) -> Result<String, ApplicationError> {
        let tree = transcript.replay().context(TranscriptSnafu)?;
        info!(
            "Rebuilt tree with {} directories, {} bytes in total",
            tree.directory_count(),
            tree.root().cumulative_size()
        );

        let report = Report {
            tree: &tree,
            threshold: disk.threshold,
            small_directories_total: small_directories_total(&tree, disk.threshold)
                .context(SmallDirectoriesSnafu)?,
            deletion: minimum_deletable_size(&tree, disk.total_capacity, disk.required_free)
                .context(DeletionSnafu)?,
        };

        if dump_tree {
            Ok(format!("{}{}", TreeDump(&tree), report))
        } else {
            Ok(report.to_string())
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    DiskConfigError { source: DiskConfigError },
    #[snafu(display("Critical failure encountered during transcript replay"))]
    TranscriptError { source: TranscriptError },
    #[snafu(display("Critical failure encountered while totalling small directories"))]
    SmallDirectoriesError { source: SmallDirectoriesError },
    #[snafu(display("Critical failure encountered while picking a directory to delete"))]
    DeletionError { source: DeletionError },
}
