//! # Container Formats
//!
//! Identification of the supported container formats, both by host request
//! and by sniffing the magic bytes at the start of a stream.

use std::fmt;
use std::io::SeekFrom;

use symphonia::core::codecs::{CodecType, CODEC_TYPE_FLAC, CODEC_TYPE_VORBIS};
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::error::{BridgeError, Result};
use crate::ops::StreamOps;

/// Container formats this bridge can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// FLAC in its native container.
    Flac,
    /// Vorbis audio in an Ogg container.
    OggVorbis,
}

impl Format {
    /// Magic bytes at the very beginning of a FLAC stream.
    pub const FLAC_MAGIC: [u8; 4] = *b"fLaC";

    /// Magic bytes at the very beginning of an Ogg stream.
    pub const OGG_MAGIC: [u8; 4] = *b"OggS";

    /// Identify a format from its leading magic bytes.
    pub fn from_magic(magic: &[u8; 4]) -> Option<Format> {
        match *magic {
            Self::FLAC_MAGIC => Some(Format::Flac),
            Self::OGG_MAGIC => Some(Format::OggVorbis),
            _ => None,
        }
    }

    /// Conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Flac => "flac",
            Format::OggVorbis => "ogg",
        }
    }

    /// Probe hint steering the engine toward this format.
    pub(crate) fn hint(&self) -> Hint {
        let mut hint = Hint::new();
        hint.with_extension(self.extension());
        hint
    }

    /// Whether a track's codec matches this container format.
    pub(crate) fn matches_codec(&self, codec: CodecType) -> bool {
        match self {
            Format::Flac => codec == CODEC_TYPE_FLAC,
            Format::OggVorbis => codec == CODEC_TYPE_VORBIS,
        }
    }

    /// Check that the decoder for this format was compiled in.
    pub(crate) fn validate_support(&self) -> Result<()> {
        match self {
            Format::Flac => {
                #[cfg(not(feature = "decoder-flac"))]
                return Err(BridgeError::UnsupportedFormat(
                    "FLAC decoding is not enabled; enable the 'decoder-flac' feature".to_string(),
                ));
                #[cfg(feature = "decoder-flac")]
                Ok(())
            }
            Format::OggVorbis => {
                #[cfg(not(feature = "decoder-vorbis"))]
                return Err(BridgeError::UnsupportedFormat(
                    "Vorbis decoding is not enabled; enable the 'decoder-vorbis' feature"
                        .to_string(),
                ));
                #[cfg(feature = "decoder-vorbis")]
                Ok(())
            }
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Flac => f.write_str("FLAC"),
            Format::OggVorbis => f.write_str("Ogg Vorbis"),
        }
    }
}

/// Sniff the container format from the stream's leading magic bytes.
///
/// Reads four bytes and seeks back to where the stream stood, so the
/// operations must support seeking. Streams shorter than four bytes or with
/// an unknown magic are rejected with [`BridgeError::UnsupportedFormat`].
pub fn detect_format(ops: &mut dyn StreamOps) -> Result<Format> {
    if !ops.is_seekable() {
        return Err(BridgeError::SeekUnsupported);
    }

    let start = ops
        .tell()
        .map_err(|err| BridgeError::ReadFailure(err.to_string()))?;

    let mut magic = [0u8; 4];
    let mut filled = 0;
    while filled < magic.len() {
        let n = ops
            .read(&mut magic[filled..])
            .map_err(|err| BridgeError::ReadFailure(err.to_string()))?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    ops.seek(SeekFrom::Start(start))
        .map_err(|err| BridgeError::ReadFailure(err.to_string()))?;

    if filled < magic.len() {
        return Err(BridgeError::UnsupportedFormat(
            "stream is too short to carry a container magic".to_string(),
        ));
    }

    let format = Format::from_magic(&magic).ok_or_else(|| {
        BridgeError::UnsupportedFormat("unrecognized container magic".to_string())
    })?;

    debug!(%format, "container magic identified");
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::MemoryStream;

    #[test]
    fn magic_identification() {
        assert_eq!(Format::from_magic(b"fLaC"), Some(Format::Flac));
        assert_eq!(Format::from_magic(b"OggS"), Some(Format::OggVorbis));
        assert_eq!(Format::from_magic(b"RIFF"), None);
    }

    #[test]
    fn extensions_match_convention() {
        assert_eq!(Format::Flac.extension(), "flac");
        assert_eq!(Format::OggVorbis.extension(), "ogg");
    }

    #[test]
    fn detection_rewinds_the_stream() {
        let mut stream = MemoryStream::from_slice(b"fLaC\x00\x00\x00\x22");
        assert_eq!(detect_format(&mut stream).unwrap(), Format::Flac);
        assert_eq!(stream.tell().unwrap(), 0);
    }

    #[test]
    fn unknown_magic_is_rejected() {
        let mut stream = MemoryStream::from_slice(b"RIFF1234");
        assert!(matches!(
            detect_format(&mut stream),
            Err(BridgeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn short_streams_are_rejected() {
        let mut stream = MemoryStream::from_slice(b"Og");
        assert!(matches!(
            detect_format(&mut stream),
            Err(BridgeError::UnsupportedFormat(_))
        ));
    }
}
