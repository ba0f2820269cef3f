//! Error types for the `web` layer.
use std::error::Error as StdError;
use std::fmt;

use relay::error::{Error as RelayError, ErrorKind as RelayErrorKind};

pub type Result<T> = core::result::Result<T, Error>;

/// Errors in the web layer hold the original error in `source` and a
/// `error_kind` tree describing where it happened. Relay errors are translated
/// into `ErrorKind::Relay` so callers of `web` never match on `relay` kinds.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The TCP listener could not be bound to the configured address.
    Bind,
    /// The HTTP server loop exited with an I/O error.
    Serve,
    Relay(RelayFrameErrorKind),
}

/// The subset of relay failures a socket handler can observe.
#[derive(Debug, PartialEq)]
pub enum RelayFrameErrorKind {
    /// A client sent a frame that is not a `{event, data}` envelope.
    InvalidFrame,
    /// The relay event loop has stopped.
    Unavailable,
}

impl Error {
    pub fn bind(err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Bind,
        }
    }

    pub fn serve(err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Serve,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(fmt, "Web Error: {:?}: {source}", self.error_kind),
            None => write!(fmt, "Web Error: {:?}", self.error_kind),
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

// This is where we translate errors from the `relay` layer to the `web` layer.
impl From<RelayError> for Error {
    fn from(err: RelayError) -> Self {
        let frame_error_kind = match err.error_kind {
            RelayErrorKind::Decode => RelayFrameErrorKind::InvalidFrame,
            RelayErrorKind::Encode | RelayErrorKind::RelayStopped => {
                RelayFrameErrorKind::Unavailable
            }
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: ErrorKind::Relay(frame_error_kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_become_invalid_frame() {
        let relay_err = relay::message::Envelope::decode("nope").unwrap_err();
        let err: Error = relay_err.into();
        assert_eq!(
            err.error_kind,
            ErrorKind::Relay(RelayFrameErrorKind::InvalidFrame)
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn stopped_relay_becomes_unavailable() {
        let err: Error = RelayError::relay_stopped().into();
        assert_eq!(
            err.error_kind,
            ErrorKind::Relay(RelayFrameErrorKind::Unavailable)
        );
    }

    #[test]
    fn bind_error_display() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err = Error::bind(io);
        assert_eq!(err.to_string(), "Web Error: Bind: address in use");
    }
}
