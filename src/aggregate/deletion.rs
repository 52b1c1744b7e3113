use snafu::{OptionExt, Snafu, ensure};
use tracing::debug;

use crate::filesystem::{DirectoryId, DirectoryTree};

/// The smallest directory that frees enough space once deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionCandidate {
    pub directory: DirectoryId,
    pub size: u64,
    /// Space that still has to be freed to reach the required free space
    pub must_free: u64,
    /// Space used by the whole tree
    pub used: u64,
}

pub fn minimum_deletable_size(
    tree: &DirectoryTree,
    total_capacity: u64,
    required_free: u64,
) -> Result<DeletionCandidate, DeletionError> {
    ensure!(
        required_free <= total_capacity,
        RequiredExceedsCapacitySnafu {
            required_free,
            total_capacity,
        }
    );

    let used = tree.root().cumulative_size();
    let available = total_capacity
        .checked_sub(used)
        .context(UsageExceedsCapacitySnafu {
            used,
            total_capacity,
        })?;
    let must_free = required_free.saturating_sub(available);
    debug!(
        "{} of {} used, {} available, {} must be freed",
        used, total_capacity, available, must_free
    );

    tree.breadth_first()
        .filter(|(_, directory)| directory.cumulative_size() >= must_free)
        .min_by_key(|(_, directory)| directory.cumulative_size())
        .map(|(id, directory)| DeletionCandidate {
            directory: id,
            size: directory.cumulative_size(),
            must_free,
            used,
        })
        .context(NoCandidateSnafu { must_free })
}

#[derive(Debug, Snafu)]
pub enum DeletionError {
    #[snafu(display(
        "Required free space {} exceeds the total capacity {}",
        required_free,
        total_capacity
    ))]
    RequiredExceedsCapacity {
        required_free: u64,
        total_capacity: u64,
    },
    #[snafu(display("Used space {} exceeds the total capacity {}", used, total_capacity))]
    UsageExceedsCapacity { used: u64, total_capacity: u64 },
    #[snafu(display("No directory is large enough to free {} bytes", must_free))]
    NoCandidate { must_free: u64 },
}
