//! Error types for the `relay` layer.
use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = core::result::Result<T, Error>;

/// Top-level relay error type.
/// The `source` field holds the original error (if any) and `error_kind` says
/// which relay operation failed. Callers in `web` translate these into their
/// own error kinds rather than depending on the details here.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Enum representing the kinds of errors that can occur in the `relay` layer.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// An inbound text frame was not a valid `{event, data}` envelope.
    Decode,
    /// An envelope could not be serialized.
    Encode,
    /// The event loop is no longer running.
    RelayStopped,
}

impl Error {
    pub fn relay_stopped() -> Self {
        Error {
            source: None,
            error_kind: ErrorKind::RelayStopped,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "Relay Error: {:?}: {source}", self.error_kind),
            None => write!(f, "Relay Error: {:?}", self.error_kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}
