use std::collections::VecDeque;

pub const ROOT_NAME: &str = "/";

/// Index of a directory inside a [`DirectoryTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectoryId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    name: String,
    size: u64,
}

impl File {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// A directory node. Children are stored as ids into the owning tree, the
/// parent link is a plain id as well, so ownership stays with the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    name: String,
    parent: Option<DirectoryId>,
    files: Vec<File>,
    subdirectories: Vec<DirectoryId>,
    cumulative_size: u64,
}

impl Directory {
    fn new(name: impl Into<String>, parent: Option<DirectoryId>) -> Self {
        Self {
            name: name.into(),
            parent,
            files: Vec::new(),
            subdirectories: Vec::new(),
            cumulative_size: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<DirectoryId> {
        self.parent
    }

    pub fn files(&self) -> &[File] {
        &self.files
    }

    pub fn subdirectories(&self) -> &[DirectoryId] {
        &self.subdirectories
    }

    /// Size of every file below this directory, nested ones included
    pub fn cumulative_size(&self) -> u64 {
        self.cumulative_size
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena holding every directory of one replayed session.
///
/// The root always lives at index 0 and is named `/`. Nodes are never
/// removed, so a [`DirectoryId`] handed out by the tree stays valid for the
/// lifetime of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryTree {
    directories: Vec<Directory>,
}

impl Default for DirectoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryTree {
    pub fn new() -> Self {
        Self {
            directories: vec![Directory::new(ROOT_NAME, None)],
        }
    }

    pub fn root_id(&self) -> DirectoryId {
        DirectoryId(0)
    }

    pub fn root(&self) -> &Directory {
        &self.directories[0]
    }

    pub fn get(&self, id: DirectoryId) -> Option<&Directory> {
        self.directories.get(id.0)
    }

    /// Looks up a directory by an id this tree handed out.
    ///
    /// # Panics
    /// If `id` belongs to another tree and is out of range.
    pub fn directory(&self, id: DirectoryId) -> &Directory {
        &self.directories[id.0]
    }

    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    /// Finds the first direct subdirectory of `parent` named `name`, in
    /// insertion order.
    pub fn find_child(&self, parent: DirectoryId, name: &str) -> Option<DirectoryId> {
        self.get(parent)?
            .subdirectories
            .iter()
            .copied()
            .find(|child| self.directory(*child).name == name)
    }

    /// Absolute `/a/b` style path of a directory
    pub fn path_of(&self, id: DirectoryId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .filter_map(|current| self.get(current))
            .filter(|directory| !directory.is_root())
            .map(|directory| directory.name.as_str())
            .collect();

        if names.is_empty() {
            return ROOT_NAME.to_string();
        }
        names.reverse();
        names
            .iter()
            .fold(String::new(), |acc, name| format!("{acc}/{name}"))
    }

    /// Enumerates directories root first, then level by level, expanding
    /// each directory's subdirectories in insertion order.
    pub fn breadth_first(&self) -> BreadthFirst<'_> {
        BreadthFirst {
            tree: self,
            queue: VecDeque::from([self.root_id()]),
        }
    }

    pub(crate) fn push_directory(
        &mut self,
        parent: DirectoryId,
        name: impl Into<String>,
    ) -> DirectoryId {
        let id = DirectoryId(self.directories.len());
        self.directories.push(Directory::new(name, Some(parent)));
        self.directories[parent.0].subdirectories.push(id);
        id
    }

    /// Appends a file to `directory` and adds its size to the directory and
    /// every ancestor up to the root.
    ///
    /// Returns the file back, leaving the tree untouched, when any of those
    /// sizes would overflow.
    pub(crate) fn push_file(&mut self, directory: DirectoryId, file: File) -> Result<(), File> {
        let size = file.size;
        let fits = self
            .ancestors(directory)
            .all(|id| self.directories[id.0].cumulative_size.checked_add(size).is_some());
        if !fits {
            return Err(file);
        }

        self.directories[directory.0].files.push(file);
        let mut next = Some(directory);
        while let Some(current) = next {
            let node = &mut self.directories[current.0];
            node.cumulative_size += size;
            next = node.parent;
        }
        Ok(())
    }

    /// `id` followed by its parent chain up to the root
    fn ancestors(&self, id: DirectoryId) -> impl Iterator<Item = DirectoryId> + '_ {
        std::iter::successors(Some(id), |current| self.get(*current)?.parent)
    }
}

pub struct BreadthFirst<'a> {
    tree: &'a DirectoryTree,
    queue: VecDeque<DirectoryId>,
}

impl<'a> Iterator for BreadthFirst<'a> {
    type Item = (DirectoryId, &'a Directory);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.queue.pop_front()?;
        let directory = self.tree.get(id)?;
        self.queue.extend(directory.subdirectories.iter().copied());
        Some((id, directory))
    }
}
