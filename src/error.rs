//! Error types for the replication protocol core

use thiserror::Error;

/// Result type alias using the protocol Error
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for request decoding, dispatch and encoding.
///
/// Framing and I/O errors are fatal to the connection that produced them;
/// everything else terminates only the request in flight and must be turned
/// into a well-formed failure response by the transport layer.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors from the underlying byte stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Opcode outside this protocol generation's catalog (version skew)
    #[error("unknown operation: opcode {0} is not in this catalog")]
    UnknownOperation(u8),

    /// Opcode recognized but intentionally retired
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Request structurally valid but not served by this protocol generation
    #[error("rejected by protocol: {0}")]
    ProtocolRejected(String),

    /// Malformed or truncated input while decoding a frame
    #[error("framing error: {0}")]
    Framing(String),

    /// Failure propagated from the master-side domain collaborator
    #[error("master error: {0}")]
    Domain(String),

    /// Invariant violation inside the dispatch machinery
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an unsupported-operation error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create a protocol-rejection error
    pub fn protocol_rejected(msg: impl Into<String>) -> Self {
        Self::ProtocolRejected(msg.into())
    }

    /// Create a framing error
    pub fn framing(msg: impl Into<String>) -> Self {
        Self::Framing(msg.into())
    }

    /// Create a domain error
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True when the connection that produced this error must be dropped
    /// rather than answered with a failure response.
    pub fn is_connection_fatal(&self) -> bool {
        matches!(self, Self::Framing(_) | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_is_connection_fatal() {
        assert!(Error::framing("truncated").is_connection_fatal());
        assert!(!Error::UnknownOperation(200).is_connection_fatal());
        assert!(!Error::protocol_rejected("old client").is_connection_fatal());
        assert!(!Error::domain("ids exhausted").is_connection_fatal());
    }
}
