//! Error types shared by the extractor, the annotator and the walker.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The page has no element whose id equals the key derived from its file name.
    #[error("element with id '{id}' not found in {}", path.display())]
    MissingTarget { id: String, path: PathBuf },

    #[error("unable to read {}", path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to write {}", path.display())]
    UnwritableDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to load markup from {}: {reason}", path.display())]
    MalformedMarkup { path: PathBuf, reason: String },

    #[error("invalid file pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl Error {
    /// Recoverable errors skip the current item; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::MissingTarget { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
