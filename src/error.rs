use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a fault, used to pick the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownCharacter,
    UnmatchedDelimiter,
    TapeOutOfBounds,
    SourceUnavailable,
    Unknown,
    StepLimit,
}

impl ErrorKind {
    /// Exit status reported by the binary. 0 is reserved for a clean run.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::UnknownCharacter => 1,
            ErrorKind::UnmatchedDelimiter => 2,
            ErrorKind::TapeOutOfBounds => 3,
            ErrorKind::SourceUnavailable => 4,
            ErrorKind::Unknown => 5,
            ErrorKind::StepLimit => 6,
        }
    }
}

/// Every way a run can fail. All of them are fatal.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown character {:?} at offset {offset}", as_char(.byte))]
    UnknownCharacter { byte: u8, offset: usize },

    #[error("missing matching bracket for '{open}{close}' at character {offset}")]
    UnmatchedDelimiter {
        open: char,
        close: char,
        offset: usize,
    },

    #[error("stack pointer out of bounds (moved to {attempted}, tape holds {capacity} cells)")]
    TapeOutOfBounds { attempted: isize, capacity: usize },

    #[error("Unable to open file '{}'", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("step limit of {limit} instructions exceeded")]
    StepLimit { limit: usize },

    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
}

fn as_char(byte: &u8) -> char {
    char::from(*byte)
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownCharacter { .. } => ErrorKind::UnknownCharacter,
            Error::UnmatchedDelimiter { .. } => ErrorKind::UnmatchedDelimiter,
            Error::TapeOutOfBounds { .. } => ErrorKind::TapeOutOfBounds,
            Error::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            Error::StepLimit { .. } => ErrorKind::StepLimit,
            Error::Io(_) => ErrorKind::Unknown,
        }
    }
}
