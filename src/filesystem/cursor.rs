use snafu::{OptionExt, Snafu};
use tracing::{debug, trace};

use crate::filesystem::{DirectoryId, DirectoryTree, File, ROOT_NAME};

const PARENT_DIRECTORY: &str = "..";

/// Stateful builder used while replaying a transcript.
///
/// Holds the tree being built and the directory new entries are inserted
/// into. Both are unset until the first `cd /`.
#[derive(Debug, Default)]
pub struct Cursor {
    tree: Option<DirectoryTree>,
    current: Option<DirectoryId>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cd(&mut self, path: &str) -> Result<(), CursorError> {
        if path == ROOT_NAME {
            self.reset();
            return Ok(());
        }

        let (tree, current) = self.position("cd")?;
        let target = if path == PARENT_DIRECTORY {
            tree.directory(current)
                .parent()
                .context(InvalidStateSnafu {
                    operation: "cd ..",
                    reason: "already at the root directory",
                })?
        } else {
            tree.find_child(current, path)
                .with_context(|| NotFoundSnafu {
                    name: path,
                    directory: tree.path_of(current),
                })?
        };

        self.current = Some(target);
        debug!(
            "Changed directory to {}",
            self.current_path().unwrap_or_default()
        );
        Ok(())
    }

    pub fn insert_file(&mut self, name: &str, size: u64) -> Result<(), CursorError> {
        let (tree, current) = self.position_mut("insert a file")?;
        if tree.push_file(current, File::new(name, size)).is_err() {
            return SizeOverflowSnafu {
                name,
                size,
                directory: tree.path_of(current),
            }
            .fail();
        }
        trace!(
            "Inserted file {} ({}) into {}",
            name,
            size,
            self.current_path().unwrap_or_default()
        );
        Ok(())
    }

    pub fn insert_folder(&mut self, name: &str) -> Result<(), CursorError> {
        let (tree, current) = self.position_mut("insert a folder")?;
        tree.push_directory(current, name);
        trace!(
            "Inserted folder {} into {}",
            name,
            self.current_path().unwrap_or_default()
        );
        Ok(())
    }

    /// `/a/b` style path of the directory being populated
    pub fn current_path(&self) -> Option<String> {
        let tree = self.tree.as_ref()?;
        self.current.map(|id| tree.path_of(id))
    }

    /// Hands over the finished tree.
    pub fn into_tree(self) -> Result<DirectoryTree, CursorError> {
        self.tree.context(InvalidStateSnafu {
            operation: "finish the tree",
            reason: "no root directory was ever entered",
        })
    }

    fn reset(&mut self) {
        if self.tree.is_some() {
            debug!("Discarding the previous tree, starting from a fresh root");
        }
        let tree = DirectoryTree::new();
        self.current = Some(tree.root_id());
        self.tree = Some(tree);
    }

    fn position(
        &self,
        operation: &'static str,
    ) -> Result<(&DirectoryTree, DirectoryId), CursorError> {
        match (self.tree.as_ref(), self.current) {
            (Some(tree), Some(current)) => Ok((tree, current)),
            _ => InvalidStateSnafu {
                operation,
                reason: "no current directory is set",
            }
            .fail(),
        }
    }

    fn position_mut(
        &mut self,
        operation: &'static str,
    ) -> Result<(&mut DirectoryTree, DirectoryId), CursorError> {
        match (self.tree.as_mut(), self.current) {
            (Some(tree), Some(current)) => Ok((tree, current)),
            _ => InvalidStateSnafu {
                operation,
                reason: "no current directory is set",
            }
            .fail(),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum CursorError {
    #[snafu(display("Cannot {operation}: {reason}"))]
    InvalidState {
        operation: &'static str,
        reason: &'static str,
    },
    #[snafu(display("No directory named '{name}' inside {directory}"))]
    NotFound { name: String, directory: String },
    #[snafu(display("Adding '{name}' ({size} bytes) to {directory} overflows a directory size"))]
    SizeOverflow {
        name: String,
        size: u64,
        directory: String,
    },
}
