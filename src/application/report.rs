use std::fmt;

use colored::Colorize;

use crate::aggregate::DeletionCandidate;
use crate::filesystem::{DirectoryId, DirectoryTree};

const INDENT_WIDTH: usize = 2;

/// Indented dump of every directory and file, subdirectories first
pub struct TreeDump<'a>(pub &'a DirectoryTree);

enum DumpStep {
    Directory(DirectoryId, usize),
    Files(DirectoryId, usize),
}

impl fmt::Display for TreeDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.0;
        let mut stack = vec![DumpStep::Directory(tree.root_id(), 0)];

        // Depth is bounded by the heap, not the call stack
        while let Some(step) = stack.pop() {
            match step {
                DumpStep::Directory(id, depth) => {
                    let directory = tree.directory(id);
                    writeln!(
                        f,
                        "{:indent$}- {} (dir, size={})",
                        "",
                        directory.name().blue().bold(),
                        directory.cumulative_size(),
                        indent = depth * INDENT_WIDTH
                    )?;
                    stack.push(DumpStep::Files(id, depth + 1));
                    stack.extend(
                        directory
                            .subdirectories()
                            .iter()
                            .rev()
                            .map(|child| DumpStep::Directory(*child, depth + 1)),
                    );
                }
                DumpStep::Files(id, depth) => {
                    for file in tree.directory(id).files() {
                        writeln!(
                            f,
                            "{:indent$}- {} (file, size={})",
                            "",
                            file.name(),
                            file.size(),
                            indent = depth * INDENT_WIDTH
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Answers to both queries, in the order they are printed
pub struct Report<'a> {
    pub tree: &'a DirectoryTree,
    pub threshold: u64,
    pub small_directories_total: u64,
    pub deletion: DeletionCandidate,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}",
            format!("Total of directories up to {}:", self.threshold).bold(),
            self.small_directories_total
        )?;
        writeln!(
            f,
            "{} {} (used {})",
            "Space to free:".bold(),
            self.deletion.must_free,
            self.deletion.used
        )?;
        write!(
            f,
            "{} {} ({})",
            "Smallest directory to delete:".bold(),
            self.deletion.size.to_string().green(),
            self.tree.path_of(self.deletion.directory)
        )
    }
}
