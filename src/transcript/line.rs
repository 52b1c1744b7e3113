use std::num::ParseIntError;

use derive_more::Display;
use snafu::{OptionExt, ResultExt, Snafu};

const COMMAND_MARKER: &str = "$";
const DIRECTORY_MARKER: &str = "dir";

/// One non-blank line of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TranscriptLine {
    #[display("$ cd {_0}")]
    ChangeDirectory(String),
    #[display("$ ls")]
    List,
    #[display("$ {_0}")]
    UnknownCommand(String),
    #[display("dir {_0}")]
    Directory(String),
    #[display("{size} {name}")]
    File { name: String, size: u64 },
}

impl TranscriptLine {
    fn parse_command(rest: &str) -> Result<Self, LineParseError> {
        let mut tokens = rest.split_whitespace();
        match tokens.next() {
            Some("cd") => {
                let path = tokens
                    .next()
                    .context(MissingArgumentSnafu { kind: "cd" })?;
                Ok(TranscriptLine::ChangeDirectory(path.to_string()))
            }
            Some("ls") => Ok(TranscriptLine::List),
            Some(other) => Ok(TranscriptLine::UnknownCommand(other.to_string())),
            None => MissingArgumentSnafu { kind: "command" }.fail(),
        }
    }

    fn parse_file(line: &str) -> Result<Self, LineParseError> {
        let (size_token, name) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        let size = size_token.parse::<u64>().context(InvalidSizeSnafu {
            token: size_token,
        })?;

        let name = name.trim();
        if name.is_empty() {
            return MissingArgumentSnafu { kind: "file" }.fail();
        }

        Ok(TranscriptLine::File {
            name: name.to_string(),
            size,
        })
    }
}

impl TryFrom<&str> for TranscriptLine {
    type Error = LineParseError;

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix(COMMAND_MARKER) {
            return Self::parse_command(rest);
        }

        let mut tokens = line.split_whitespace();
        if tokens.next() == Some(DIRECTORY_MARKER) {
            let name = tokens
                .next()
                .context(MissingArgumentSnafu { kind: "dir" })?;
            return Ok(TranscriptLine::Directory(name.to_string()));
        }

        Self::parse_file(line)
    }
}

#[derive(Debug, Snafu)]
pub enum LineParseError {
    #[snafu(display("'{token}' is not a valid file size"))]
    InvalidSize {
        token: String,
        source: ParseIntError,
    },
    #[snafu(display("Missing argument for {kind} line"))]
    MissingArgument { kind: &'static str },
}
