use std::io;
use thiserror::Error;

/// A type-erased error value, as handed to the sink's error-delivery path.
///
/// Producers are expected to let failures propagate up to the sink rather
/// than handling them locally; the sink is the single authority translating
/// error kinds into response semantics.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by and routed through the sink layer.
///
/// The first three variants are distinguished *conditions* with response
/// semantics of their own; the rest are operational failures of the exchange
/// machinery.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Conditional-request short-circuit, maps to a bodyless success-class
    /// response.
    #[error("not modified")]
    NotModified,

    /// The client disconnected; raised by abort polling. Never mapped to a
    /// response, the connection is already gone.
    #[error("request aborted by client")]
    RequestAborted,

    /// A second terminal operation was invoked on an exchange that has
    /// already committed its response.
    #[error("response already committed")]
    AlreadyCommitted,

    /// The response could not be sent: framing violation, short source,
    /// malformed header value.
    #[error("send error: {reason}")]
    Send { reason: String },

    /// I/O failure while reading a source or writing the transport.
    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Unrecognized producer error, mapped to a generic failure status.
    #[error("{0}")]
    Other(BoxError),
}

impl SinkError {
    pub fn send<S: ToString>(reason: S) -> Self {
        Self::Send { reason: reason.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    pub fn other<E: Into<BoxError>>(e: E) -> Self {
        Self::Other(e.into())
    }

    /// Returns true for the client-disconnect condition.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::RequestAborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_condition() {
        assert_eq!(SinkError::NotModified.to_string(), "not modified");
        assert_eq!(SinkError::RequestAborted.to_string(), "request aborted by client");
        assert_eq!(SinkError::send("short source").to_string(), "send error: short source");
    }

    #[test]
    fn io_errors_convert() {
        let err: SinkError = io::Error::from(io::ErrorKind::BrokenPipe).into();
        assert!(matches!(err, SinkError::Io { .. }));
    }

    #[test]
    fn aborted_predicate() {
        assert!(SinkError::RequestAborted.is_aborted());
        assert!(!SinkError::NotModified.is_aborted());
    }
}
