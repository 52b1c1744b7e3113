//! Queries over a finished directory tree.
//!
//! Both queries walk the tree with [`DirectoryTree::breadth_first`]
//! and only read cumulative sizes, which the cursor already keeps current.
//!
//! [`DirectoryTree::breadth_first`]: crate::filesystem::DirectoryTree::breadth_first

mod deletion;
mod small_directories;

pub use deletion::{DeletionCandidate, DeletionError, minimum_deletable_size};
pub use small_directories::{SmallDirectoriesError, small_directories_total};
