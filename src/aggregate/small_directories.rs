use snafu::{OptionExt, Snafu};
use tracing::debug;

use crate::filesystem::DirectoryTree;

/// Sums the cumulative size of every directory at or below `threshold`.
///
/// Nested directories are counted on their own as well as inside their
/// parents, so a file may contribute to the total more than once.
pub fn small_directories_total(
    tree: &DirectoryTree,
    threshold: u64,
) -> Result<u64, SmallDirectoriesError> {
    tree.breadth_first()
        .filter(|(_, directory)| directory.cumulative_size() <= threshold)
        .inspect(|(id, directory)| {
            debug!(
                "{} counts towards the small directory total ({})",
                tree.path_of(*id),
                directory.cumulative_size()
            );
        })
        .try_fold(0u64, |total, (_, directory)| {
            total.checked_add(directory.cumulative_size())
        })
        .context(TotalOverflowSnafu { threshold })
}

#[derive(Debug, Snafu)]
pub enum SmallDirectoriesError {
    #[snafu(display("Total of directories up to {} does not fit in 64 bits", threshold))]
    TotalOverflow { threshold: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    use crate::filesystem::Cursor;
    use crate::transcript::{SAMPLE_TRANSCRIPT, Transcript};

    #[fixture]
    fn sample() -> DirectoryTree {
        Transcript::from(SAMPLE_TRANSCRIPT).replay().unwrap()
    }

    #[rstest]
    fn sums_directories_under_threshold(sample: DirectoryTree) {
        assert_eq!(small_directories_total(&sample, 100000).unwrap(), 584 + 94853);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(584, 584)]
    #[case(94852, 584)]
    #[case(24933642, 584 + 94853 + 24933642)]
    #[case(u64::MAX, 584 + 94853 + 24933642 + 48381165)]
    fn threshold_is_inclusive(sample: DirectoryTree, #[case] threshold: u64, #[case] expected: u64) {
        assert_eq!(small_directories_total(&sample, threshold).unwrap(), expected);
    }

    #[test]
    fn empty_root_counts_as_zero() {
        let tree = DirectoryTree::new();
        assert_eq!(small_directories_total(&tree, 100000).unwrap(), 0);
    }

    #[test]
    fn total_past_u64_max_is_an_error() {
        let mut cursor = Cursor::new();
        cursor.cd("/").unwrap();
        cursor.insert_folder("a").unwrap();
        cursor.cd("a").unwrap();
        cursor.insert_file("half", 1 << 63).unwrap();
        let tree = cursor.into_tree().unwrap();

        // "/" and "/a" both hold 2^63 bytes
        assert!(matches!(
            small_directories_total(&tree, u64::MAX),
            Err(SmallDirectoriesError::TotalOverflow {
                threshold: u64::MAX
            })
        ));
        assert_eq!(small_directories_total(&tree, (1 << 63) - 1).unwrap(), 0);
    }
}
