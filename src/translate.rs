//! Translation of engine-native status codes into the stable vocabulary.
//!
//! The mapping is context-sensitive: the same engine code means different
//! things during the open handshake, during packet decoding, and during a
//! seek. The translator holds no state; the resulting record is stored on
//! the session that observed it.

use std::io;

use symphonia::core::errors::{Error as EngineError, SeekErrorKind};

use crate::error::BridgeError;

/// Translate a failure raised while opening a session (container handshake,
/// header parsing, codec instantiation).
pub(crate) fn open_error(err: EngineError) -> BridgeError {
    match err {
        EngineError::Unsupported(msg) => BridgeError::UnsupportedFormat(msg.to_string()),
        EngineError::DecodeError(msg) if msg.contains("version") => {
            BridgeError::VersionMismatch(msg.to_string())
        }
        EngineError::DecodeError(msg) => BridgeError::MalformedHeader(msg.to_string()),
        EngineError::LimitError(msg) => BridgeError::MalformedHeader(msg.to_string()),
        EngineError::IoError(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
            BridgeError::MalformedHeader("stream ended before the headers could be read".to_string())
        }
        EngineError::IoError(err) => BridgeError::ReadFailure(err.to_string()),
        EngineError::SeekError(_) => {
            BridgeError::ReadFailure("seek on media failed while reading headers".to_string())
        }
        EngineError::ResetRequired => {
            BridgeError::InternalFault("engine demanded a reset during open".to_string())
        }
    }
}

/// Translate a failure raised while reading or decoding packets.
pub(crate) fn decode_error(err: EngineError) -> BridgeError {
    match err {
        EngineError::DecodeError(msg) => BridgeError::DecodeFailed(msg.to_string()),
        EngineError::LimitError(msg) => BridgeError::DecodeFailed(msg.to_string()),
        EngineError::IoError(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
            BridgeError::DecodeFailed("unexpected end of stream".to_string())
        }
        EngineError::IoError(err) => BridgeError::ReadFailure(err.to_string()),
        EngineError::Unsupported(msg) => BridgeError::UnsupportedFormat(msg.to_string()),
        EngineError::SeekError(_) => {
            BridgeError::InternalFault("unexpected seek failure during decode".to_string())
        }
        EngineError::ResetRequired => {
            BridgeError::DecodeFailed("track list changed; decoder reset required".to_string())
        }
    }
}

/// Translate a failure raised by an engine seek.
///
/// `sample_offset` is the across-all-channels offset the host requested; it
/// is echoed back in out-of-bounds reports.
pub(crate) fn seek_error(err: EngineError, sample_offset: u64) -> BridgeError {
    match err {
        EngineError::SeekError(SeekErrorKind::Unseekable)
        | EngineError::SeekError(SeekErrorKind::ForwardOnly) => BridgeError::SeekUnsupported,
        EngineError::SeekError(SeekErrorKind::OutOfRange) => {
            BridgeError::SeekOutOfBounds(sample_offset)
        }
        EngineError::SeekError(SeekErrorKind::InvalidTrack) => {
            BridgeError::InternalFault("invalid stream section supplied to the engine".to_string())
        }
        EngineError::DecodeError(msg) => BridgeError::DecodeFailed(msg.to_string()),
        EngineError::LimitError(msg) => BridgeError::DecodeFailed(msg.to_string()),
        EngineError::IoError(err) => BridgeError::ReadFailure(err.to_string()),
        EngineError::Unsupported(msg) => BridgeError::UnsupportedFormat(msg.to_string()),
        EngineError::ResetRequired => {
            BridgeError::DecodeFailed("track list changed; decoder reset required".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_context_distinguishes_header_faults() {
        assert!(matches!(
            open_error(EngineError::Unsupported("no reader for format")),
            BridgeError::UnsupportedFormat(_)
        ));
        assert!(matches!(
            open_error(EngineError::DecodeError("vorbis: header version mismatch")),
            BridgeError::VersionMismatch(_)
        ));
        assert!(matches!(
            open_error(EngineError::DecodeError("flac: invalid block type")),
            BridgeError::MalformedHeader(_)
        ));
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert!(matches!(
            open_error(EngineError::IoError(eof)),
            BridgeError::MalformedHeader(_)
        ));
        let abort = io::Error::new(io::ErrorKind::Other, "host abort");
        assert!(matches!(
            open_error(EngineError::IoError(abort)),
            BridgeError::ReadFailure(_)
        ));
    }

    #[test]
    fn decode_context_keeps_frame_errors_recoverable() {
        let err = decode_error(EngineError::DecodeError("flac: bad subframe"));
        assert!(matches!(err, BridgeError::DecodeFailed(_)));
        assert!(err.is_recoverable());

        let abort = io::Error::new(io::ErrorKind::Other, "host abort");
        let err = decode_error(EngineError::IoError(abort));
        assert!(err.is_read_failure());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn seek_context_maps_capability_and_range() {
        assert_eq!(
            seek_error(EngineError::SeekError(SeekErrorKind::Unseekable), 42),
            BridgeError::SeekUnsupported
        );
        assert_eq!(
            seek_error(EngineError::SeekError(SeekErrorKind::ForwardOnly), 42),
            BridgeError::SeekUnsupported
        );
        assert_eq!(
            seek_error(EngineError::SeekError(SeekErrorKind::OutOfRange), 42),
            BridgeError::SeekOutOfBounds(42)
        );
    }

    #[test]
    fn messages_carry_engine_diagnostics() {
        let err = decode_error(EngineError::DecodeError("flac: frame crc mismatch"));
        assert_eq!(err.to_string(), "decode error: flac: frame crc mismatch");
    }
}
