//! # Frame and Sample Marshalling
//!
//! Exposes each decoded frame batch to the host as a borrowed view over the
//! engine-owned channel planes. The view is valid only for the duration of
//! the frame callback; the engine reclaims the underlying buffer as soon as
//! the callback returns, so anything the host wants to keep must be copied
//! out explicitly.

use symphonia::core::audio::{AudioBufferRef, Signal};

use crate::error::BridgeError;
use crate::metadata::StreamInfo;

/// Host decision returned from each frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    /// Keep decoding.
    Continue,
    /// Stop decoding; the session records the abort before returning.
    Abort,
}

/// Host-side receiver for session callbacks.
///
/// All callbacks run inline on the thread driving
/// [`crate::DecoderSession::decode_next`]; the bridge introduces no
/// concurrency of its own.
pub trait FrameSink {
    /// Stream metadata, delivered exactly once per session before the first
    /// frame.
    fn on_metadata(&mut self, _info: &StreamInfo) {}

    /// One decoded frame batch. Return [`FlowControl::Abort`] when the
    /// consuming operation failed and decoding should stop.
    fn on_frame(&mut self, frame: &FramePlanes<'_>) -> FlowControl;

    /// A failure observed during decoding. The same error is also returned
    /// from the driving call; this hook exists for sinks that aggregate
    /// diagnostics.
    fn on_error(&mut self, _error: &BridgeError) {}
}

/// Borrowed view over one decoded batch of channel planes.
///
/// Samples are addressed as `(channel, index)`, both zero-based. All planes
/// have [`frames`](FramePlanes::frames) samples. Out-of-range indices are a
/// programming error and panic; the frame's shape is engine-guaranteed.
///
/// Integer-format streams yield their native-bit-depth values (a 16-bit FLAC
/// stream produces values in the 16-bit range). Floating-point engine output
/// is quantized to the signed 16-bit range.
pub struct FramePlanes<'a> {
    buf: AudioBufferRef<'a>,
    skip: usize,
}

impl<'a> FramePlanes<'a> {
    /// Wrap a decoded buffer, hiding the first `skip` samples of each plane.
    pub(crate) fn new(buf: AudioBufferRef<'a>, skip: usize) -> Self {
        debug_assert!(skip < buf.frames());
        Self { buf, skip }
    }

    /// Number of channel planes.
    pub fn channels(&self) -> usize {
        self.buf.spec().channels.count()
    }

    /// Per-channel sample count of this batch.
    pub fn frames(&self) -> usize {
        self.buf.frames() - self.skip
    }

    /// Returns `true` when the batch carries no samples.
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Sample `index` of channel `channel`.
    pub fn sample(&self, channel: usize, index: usize) -> i32 {
        let i = self.skip + index;
        match &self.buf {
            AudioBufferRef::U8(buf) => buf.chan(channel)[i] as i32 - 0x80,
            AudioBufferRef::U16(buf) => buf.chan(channel)[i] as i32 - 0x8000,
            AudioBufferRef::U24(buf) => buf.chan(channel)[i].inner() as i32 - 0x80_0000,
            AudioBufferRef::U32(buf) => (buf.chan(channel)[i] as i64 - 0x8000_0000) as i32,
            AudioBufferRef::S8(buf) => buf.chan(channel)[i] as i32,
            AudioBufferRef::S16(buf) => buf.chan(channel)[i] as i32,
            AudioBufferRef::S24(buf) => buf.chan(channel)[i].inner(),
            AudioBufferRef::S32(buf) => buf.chan(channel)[i],
            AudioBufferRef::F32(buf) => quantize(buf.chan(channel)[i]),
            AudioBufferRef::F64(buf) => quantize(buf.chan(channel)[i] as f32),
        }
    }

    /// Copy one channel plane into an owned vector.
    pub fn copy_channel(&self, channel: usize) -> Vec<i32> {
        let frames = self.frames();
        let mut out = Vec::with_capacity(frames);
        for index in 0..frames {
            out.push(self.sample(channel, index));
        }
        out
    }

    /// Copy the whole batch into an owned, interleaved vector.
    pub fn copy_interleaved(&self) -> Vec<i32> {
        let channels = self.channels();
        let frames = self.frames();
        let mut out = Vec::with_capacity(frames * channels);
        for index in 0..frames {
            for channel in 0..channels {
                out.push(self.sample(channel, index));
            }
        }
        out
    }
}

fn quantize(sample: f32) -> i32 {
    (sample * 32768.0).clamp(-32768.0, 32767.0) as i32
}
