//! Error types for the `trigger` crate.
use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

/// Failure to read the marker's modification time.
///
/// A missing marker is not an error; it is reported by the watcher as
/// "no change". These errors are logged by the polling loop and never end it.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
    pub marker: PathBuf,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The marker exists but its metadata could not be read.
    Metadata,
    /// The platform or filesystem does not expose a modification time.
    ModifiedTime,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let what = match self.error_kind {
            ErrorKind::Metadata => "unable to read metadata of",
            ErrorKind::ModifiedTime => "no modification time available for",
        };
        write!(f, "Trigger Error: {what} {}", self.marker.display())?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl Error {
    pub(crate) fn new(error_kind: ErrorKind, marker: PathBuf, source: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(source)),
            error_kind,
            marker,
        }
    }
}
