//! Error types for the `web` layer.
use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = core::result::Result<T, Error>;

/// Failures that stop the HTTP server from running at all.
///
/// Per-connection problems never surface here: a client that goes away is
/// simply unregistered.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The listening socket could not be bound.
    Bind(String),
    /// The server loop terminated with an I/O error.
    Serve,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::Bind(address) => write!(f, "Web Error: unable to bind {address}")?,
            ErrorKind::Serve => write!(f, "Web Error: server stopped unexpectedly")?,
        }
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
    pub(crate) fn bind(address: String, source: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(source)),
            error_kind: ErrorKind::Bind(address),
        }
    }

    pub(crate) fn serve(source: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(source)),
            error_kind: ErrorKind::Serve,
        }
    }
}
