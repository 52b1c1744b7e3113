//! Transcript grammar and replay.
//!
//! A transcript is the line oriented record of a shell session: `$ cd`,
//! `$ ls`, `dir <name>` and `<size> <name>` lines. Replaying it drives a
//! [`Cursor`](crate::filesystem::Cursor) one line at a time.

mod line;
mod replay;

pub use line::{LineParseError, TranscriptLine};
pub use replay::{Transcript, TranscriptError};

#[cfg(test)]
pub(crate) const SAMPLE_TRANSCRIPT: &str = "\
$ cd /
$ ls
dir a
14848514 b.txt
8504156 c.dat
dir d
$ cd a
$ ls
dir e
29116 f
2557 g
62596 h.lst
$ cd e
$ ls
584 i
$ cd ..
$ cd ..
$ cd d
$ ls
4060174 j
8033020 d.log
5626152 d.ext
7214296 k
";
