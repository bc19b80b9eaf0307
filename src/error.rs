//! # Bridge Error Types
//!
//! The stable error vocabulary exposed to hosts.
//!
//! Every engine-native status code is translated into one of these variants
//! at the boundary; hosts branch on the variant, never on message text. Display strings are part of the observable
//! contract and stay stable across versions so host logs and tests can match
//! on them.

use thiserror::Error;

/// Errors surfaced by a decoder session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    // ========================================================================
    // Open/Initialization Errors
    // ========================================================================
    /// A read issued by the engine against the host stream failed.
    #[error("a read from media returned an error: {0}")]
    ReadFailure(String),

    /// The stream does not contain audio the engine recognizes.
    #[error("bitstream does not contain any decodable audio data: {0}")]
    UnsupportedFormat(String),

    /// The stream was produced by an incompatible codec version.
    #[error("codec version mismatch: {0}")]
    VersionMismatch(String),

    /// The container or stream header is present but invalid.
    #[error("invalid bitstream header: {0}")]
    MalformedHeader(String),

    /// The engine reported a fault in its own state.
    #[error("internal logic fault; indicates a bug or heap/stack corruption: {0}")]
    InternalFault(String),

    // ========================================================================
    // Decode Errors
    // ========================================================================
    /// Malformed frame data was encountered mid-stream.
    ///
    /// The session stays usable; error-tolerant hosts may keep calling
    /// [`crate::DecoderSession::decode_next`] to resynchronize.
    #[error("decode error: {0}")]
    DecodeFailed(String),

    /// The host sink requested an abort from its frame callback.
    #[error("decoding aborted by host")]
    Aborted,

    // ========================================================================
    // Seek Errors
    // ========================================================================
    /// The stream operations do not support seeking.
    #[error("bitstream is not seekable")]
    SeekUnsupported,

    /// The requested sample offset cannot be reached.
    #[error("seek position out of bounds: {0}")]
    SeekOutOfBounds(u64),

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// The session was closed; the engine handle no longer exists.
    #[error("decoder session is closed")]
    SessionClosed,
}

impl BridgeError {
    /// Returns `true` if decoding may be re-attempted on the same session.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BridgeError::DecodeFailed(_) | BridgeError::Aborted)
    }

    /// Returns `true` if the failure originated in the host's stream
    /// operations rather than in the encoded data.
    pub fn is_read_failure(&self) -> bool {
        matches!(self, BridgeError::ReadFailure(_))
    }
}

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strings_are_stable() {
        assert_eq!(
            BridgeError::ReadFailure("boom".into()).to_string(),
            "a read from media returned an error: boom"
        );
        assert_eq!(
            BridgeError::SeekUnsupported.to_string(),
            "bitstream is not seekable"
        );
        assert_eq!(
            BridgeError::SessionClosed.to_string(),
            "decoder session is closed"
        );
        assert_eq!(
            BridgeError::InternalFault("x".into()).to_string(),
            "internal logic fault; indicates a bug or heap/stack corruption: x"
        );
    }

    #[test]
    fn recoverability_classification() {
        assert!(BridgeError::DecodeFailed("bad frame".into()).is_recoverable());
        assert!(BridgeError::Aborted.is_recoverable());
        assert!(!BridgeError::ReadFailure("io".into()).is_recoverable());
        assert!(!BridgeError::SessionClosed.is_recoverable());

        assert!(BridgeError::ReadFailure("io".into()).is_read_failure());
        assert!(!BridgeError::MalformedHeader("hdr".into()).is_read_failure());
    }
}
