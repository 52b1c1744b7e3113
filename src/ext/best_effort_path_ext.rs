use std::path::{Component, Path, PathBuf};

/// Display form of a path for log lines and error messages.
///
/// Existing paths are canonicalized. Paths that do not exist (yet) are made
/// absolute and lexically normalized instead, so a missing input file is
/// still reported with a full location.
pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        self.canonicalize()
            .unwrap_or_else(|_| {
                let absolute = std::path::absolute(self).unwrap_or_else(|_| self.to_path_buf());
                lexically_normalize(&absolute)
            })
            .display()
            .to_string()
    }
}

impl BestEffortPathExt for PathBuf {
    fn best_effort_path_display(&self) -> String {
        self.as_path().best_effort_path_display()
    }
}

fn lexically_normalize(path: &Path) -> PathBuf {
    path.components()
        .fold(Vec::new(), |mut components, component| {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if matches!(components.last(), Some(Component::Normal(_))) {
                        components.pop();
                    }
                }
                other => components.push(other),
            }
            components
        })
        .iter()
        .collect()
}
