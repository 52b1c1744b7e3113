//! Directory tree rebuilt from a shell transcript.
//!
//! The tree is an index arena: directories refer to their children and
//! their parent by [`DirectoryId`]. It is only mutated through the
//! [`Cursor`], which keeps every directory's cumulative size current as
//! files are inserted.

mod cursor;
mod tree;

pub use cursor::{Cursor, CursorError};
pub use tree::{DirectoryId, DirectoryTree, File, ROOT_NAME};
