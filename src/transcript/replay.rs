use std::path::Path;
use std::string::FromUtf8Error;

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info, warn};

use crate::ext::BestEffortPathExt;
use crate::filesystem::{Cursor, CursorError, DirectoryTree};
use crate::transcript::{LineParseError, TranscriptLine};

/// A transcript loaded into memory, ready to be replayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    contents: String,
}

impl Transcript {
    pub async fn read(path: &Path) -> Result<Self, TranscriptError> {
        debug!("Reading transcript from {}", path.best_effort_path_display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read transcript: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        Ok(Self { contents })
    }

    /// Replays every line onto a fresh cursor and returns the finished tree.
    pub fn replay(&self) -> Result<DirectoryTree, TranscriptError> {
        let mut cursor = Cursor::new();
        replay_onto(&mut cursor, self.contents.lines())?;
        cursor.into_tree().context(EmptyTranscriptSnafu)
    }
}

impl From<&str> for Transcript {
    fn from(contents: &str) -> Self {
        Self {
            contents: contents.to_string(),
        }
    }
}

/// Applies transcript lines to `cursor` in order, stopping at the first
/// failure. Blank lines are skipped but still counted for line numbers.
fn replay_onto<'a>(
    cursor: &mut Cursor,
    lines: impl IntoIterator<Item = &'a str>,
) -> Result<(), TranscriptError> {
    let mut applied = 0usize;

    for (index, raw) in lines.into_iter().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;

        let line = TranscriptLine::try_from(raw).context(LineSnafu {
            line_number,
            line: raw,
        })?;
        apply(cursor, &line).context(NavigationSnafu {
            line_number,
            line: raw,
        })?;
        applied += 1;
    }

    info!("Replayed {} transcript lines", applied);
    Ok(())
}

fn apply(cursor: &mut Cursor, line: &TranscriptLine) -> Result<(), CursorError> {
    debug!("Applying '{}'", line);
    match line {
        TranscriptLine::ChangeDirectory(path) => cursor.cd(path),
        TranscriptLine::List => Ok(()),
        TranscriptLine::UnknownCommand(command) => {
            warn!("Skipping unknown command '{}'", command);
            Ok(())
        }
        TranscriptLine::Directory(name) => cursor.insert_folder(name),
        TranscriptLine::File { name, size } => cursor.insert_file(name, *size),
    }
}

#[derive(Debug, Snafu)]
pub enum TranscriptError {
    #[snafu(display("Failed to read the transcript file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Transcript file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: FromUtf8Error,
    },
    #[snafu(display("Malformed transcript line {}: '{}'", line_number, line))]
    LineError {
        line_number: usize,
        line: String,
        source: LineParseError,
    },
    #[snafu(display("Transcript line {} cannot be applied: '{}'", line_number, line))]
    NavigationError {
        line_number: usize,
        line: String,
        source: CursorError,
    },
    #[snafu(display("Transcript never entered the root directory"))]
    EmptyTranscript { source: CursorError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::transcript::SAMPLE_TRANSCRIPT as SAMPLE;

    fn size_of(tree: &DirectoryTree, path: &str) -> u64 {
        tree.breadth_first()
            .find(|(id, _)| tree.path_of(*id) == path)
            .map(|(_, dir)| dir.cumulative_size())
            .unwrap_or_else(|| panic!("no directory at {path}"))
    }

    #[test]
    fn replays_sample_transcript() {
        let tree = Transcript::from(SAMPLE).replay().unwrap();
        assert_eq!(tree.directory_count(), 4);
        assert_eq!(size_of(&tree, "/a/e"), 584);
        assert_eq!(size_of(&tree, "/a"), 94853);
        assert_eq!(size_of(&tree, "/d"), 24933642);
        assert_eq!(size_of(&tree, "/"), 48381165);
    }

    #[test]
    fn replays_short_scenario() {
        let transcript = "$ cd /\n$ ls\ndir a\n14848514 b.txt\n$ cd a\n$ ls\n29116 f\n$ cd ..\n";
        let tree = Transcript::from(transcript).replay().unwrap();
        assert_eq!(size_of(&tree, "/"), 14877630);
        assert_eq!(size_of(&tree, "/a"), 29116);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let transcript = "\n$ cd /\n\n   \n10 f\n\n";
        let tree = Transcript::from(transcript).replay().unwrap();
        assert_eq!(tree.root().cumulative_size(), 10);
        assert_eq!(tree.root().files().len(), 1);
    }

    #[test]
    fn parse_failure_reports_line_number() {
        let transcript = "$ cd /\n\nabc f\n";
        match Transcript::from(transcript).replay() {
            Err(TranscriptError::LineError {
                line_number,
                line,
                source: LineParseError::InvalidSize { .. },
            }) => {
                assert_eq!(line_number, 3);
                assert_eq!(line, "abc f");
            }
            other => panic!("Expected LineError, got {other:?}"),
        }
    }

    #[test]
    fn unknown_directory_halts_replay() {
        let transcript = "$ cd /\n$ cd missing\n10 never\n";
        let result = Transcript::from(transcript).replay();
        assert!(matches!(
            result,
            Err(TranscriptError::NavigationError {
                line_number: 2,
                source: CursorError::NotFound { .. },
                ..
            })
        ));
    }

    #[test]
    fn entries_before_root_are_invalid_state() {
        let result = Transcript::from("dir a\n").replay();
        assert!(matches!(
            result,
            Err(TranscriptError::NavigationError {
                source: CursorError::InvalidState { .. },
                ..
            })
        ));
    }

    #[test]
    fn empty_transcript_has_no_tree() {
        let result = Transcript::from("\n\n").replay();
        assert!(matches!(
            result,
            Err(TranscriptError::EmptyTranscript { .. })
        ));
    }

    #[test]
    fn second_root_discards_previous_entries() {
        let transcript = "$ cd /\ndir a\n100 f\n$ cd /\n5 g\n";
        let tree = Transcript::from(transcript).replay().unwrap();
        assert_eq!(tree.directory_count(), 1);
        assert_eq!(tree.root().cumulative_size(), 5);
    }

    #[test]
    fn unknown_commands_are_skipped() {
        let transcript = "$ cd /\n$ pwd\n7 f\n";
        let tree = Transcript::from(transcript).replay().unwrap();
        assert_eq!(tree.root().cumulative_size(), 7);
    }

    #[test]
    fn sizes_past_u64_max_halt_replay() {
        let transcript = "$ cd /\n18446744073709551615 a\n1 b\n";
        match Transcript::from(transcript).replay() {
            Err(TranscriptError::NavigationError {
                line_number,
                source: CursorError::SizeOverflow { name, .. },
                ..
            }) => {
                assert_eq!(line_number, 3);
                assert_eq!(name, "b");
            }
            other => panic!("Expected SizeOverflow, got {other:?}"),
        }
    }

    #[compio::test]
    async fn reads_transcript_from_file() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        write!(temp_file, "{}", SAMPLE).expect("Failed to write to temp file");

        let transcript = Transcript::read(temp_file.path())
            .await
            .expect("Failed to read transcript");

        assert_eq!(transcript, Transcript::from(SAMPLE));
        assert_eq!(transcript.replay().unwrap().root().cumulative_size(), 48381165);
    }

    #[compio::test]
    async fn read_returns_error_on_nonexistent_file() {
        let result = Transcript::read(Path::new("/this/path/does/not/exist.txt")).await;
        assert!(matches!(result, Err(TranscriptError::ReadError { .. })));
    }

    #[compio::test]
    async fn read_returns_error_on_invalid_utf8() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        temp_file
            .write_all(&[0x24, 0x20, 0xff, 0xfe])
            .expect("Failed to write to temp file");

        let result = Transcript::read(temp_file.path()).await;
        assert!(matches!(result, Err(TranscriptError::EncodingError { .. })));
    }
}
