//! # Metadata Capture
//!
//! One-shot extraction of stream-level facts from the engine's track
//! parameters. Only the stream-information surface matters here; embedded
//! tags, pictures, and other metadata blocks are not this crate's concern.

use symphonia::core::codecs::CodecParameters;

use crate::error::{BridgeError, Result};

/// Immutable snapshot of a stream's declared format.
///
/// Captured at most once per session, before the first decoded frame is
/// delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// Declared sample count summed across all channels, or `None` when the
    /// stream does not declare a length.
    ///
    /// This is the combined count: a stereo stream with 1000 samples per
    /// channel reports 2000. Use [`per_channel_samples`] for the per-channel
    /// value. An unknown length is never reported as zero.
    ///
    /// [`per_channel_samples`]: StreamInfo::per_channel_samples
    pub total_samples: Option<u64>,

    /// Number of audio channels; always positive.
    pub channels: u32,

    /// Sample rate in Hz; always positive.
    pub sample_rate: u32,
}

impl StreamInfo {
    /// Build the snapshot from the selected track's codec parameters.
    ///
    /// Fails with [`BridgeError::MalformedHeader`] when the stream header
    /// omits a channel count or sample rate; FLAC and Vorbis headers always
    /// carry both, so absence means the header is lying.
    pub(crate) fn from_params(params: &CodecParameters) -> Result<Self> {
        let channels = params
            .channels
            .map(|channels| channels.count() as u32)
            .ok_or_else(|| {
                BridgeError::MalformedHeader("stream info carries no channel count".to_string())
            })?;
        if channels == 0 {
            return Err(BridgeError::MalformedHeader(
                "stream info declares zero channels".to_string(),
            ));
        }

        let sample_rate = params.sample_rate.ok_or_else(|| {
            BridgeError::MalformedHeader("stream info carries no sample rate".to_string())
        })?;
        if sample_rate == 0 {
            return Err(BridgeError::MalformedHeader(
                "stream info declares a zero sample rate".to_string(),
            ));
        }

        let total_samples = params.n_frames.map(|frames| frames * channels as u64);

        Ok(Self {
            total_samples,
            channels,
            sample_rate,
        })
    }

    /// Declared per-channel sample count, or `None` when unknown.
    pub fn per_channel_samples(&self) -> Option<u64> {
        self.total_samples.map(|total| total / self.channels as u64)
    }
}
