//! # Decoder Session Lifecycle
//!
//! Owns the opaque engine handle, wires the stream adapter into it at open,
//! drives it packet by packet, and guarantees that engine resources are
//! released exactly once on every exit path.

use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as EngineError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use tracing::{debug, error, info, instrument, warn};

use crate::adapter::OpsSource;
use crate::error::{BridgeError, Result};
use crate::format::{detect_format, Format};
use crate::frame::{FlowControl, FramePlanes, FrameSink};
use crate::metadata::StreamInfo;
use crate::ops::StreamOps;
use crate::translate;

/// Outcome of a single [`DecoderSession::decode_next`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeProgress {
    /// One frame batch was decoded and delivered to the sink.
    Frame {
        /// Per-channel sample count of the delivered batch.
        frames: usize,
    },
    /// The stream ended cleanly.
    EndOfStream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Ready,
    Failed,
    Closed,
}

/// The opaque engine pair: container reader and codec decoder.
///
/// Exclusively owned by one session and never shared; dropping it releases
/// every engine-side resource, including the stream adapter and the host
/// operations behind it.
struct Engine {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
}

/// One in-progress or completed decode of a single logical stream.
///
/// The session is `Send` and may be moved to another thread, but must be
/// exclusively accessed by one thread at a time; run concurrent decodes on
/// separate sessions.
pub struct DecoderSession {
    engine: Option<Engine>,
    format: Format,
    info: StreamInfo,
    metadata_delivered: bool,
    last_error: Option<BridgeError>,
    state: SessionState,
    /// Per-channel frames decoded so far.
    position: u64,
    /// Frames to discard after a coarse engine seek landing.
    pending_skip: u64,
    eof: bool,
}

impl std::fmt::Debug for DecoderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderSession")
            .field("engine", &self.engine.as_ref().map(|_| "<opaque>"))
            .field("format", &self.format)
            .field("info", &self.info)
            .field("metadata_delivered", &self.metadata_delivered)
            .field("last_error", &self.last_error)
            .field("state", &self.state)
            .field("position", &self.position)
            .field("pending_skip", &self.pending_skip)
            .field("eof", &self.eof)
            .finish()
    }
}

impl DecoderSession {
    /// Open a session for a known container format.
    ///
    /// Performs the container handshake, selects the first decodable track,
    /// verifies it matches `format`, captures the stream metadata, and
    /// instantiates the codec. On any failure every partially constructed
    /// engine resource is dropped before this returns; nothing leaks.
    #[instrument(skip(ops))]
    pub fn open<S: StreamOps + 'static>(format: Format, ops: S) -> Result<Self> {
        Self::open_boxed(format, Box::new(ops))
    }

    /// Open a session, sniffing the container format from the stream magic.
    pub fn open_detect<S: StreamOps + 'static>(ops: S) -> Result<Self> {
        let mut ops = Box::new(ops) as Box<dyn StreamOps>;
        let format = detect_format(ops.as_mut())?;
        Self::open_boxed(format, ops)
    }

    /// [`open`](DecoderSession::open) for already-boxed stream operations.
    pub fn open_boxed(format: Format, ops: Box<dyn StreamOps>) -> Result<Self> {
        format.validate_support()?;

        let source = OpsSource::new(ops);
        let stream = MediaSourceStream::new(Box::new(source), MediaSourceStreamOptions::default());

        // Container handshake. The probe consumes the media source; when it
        // fails, everything it built up is dropped right here.
        let probed = symphonia::default::get_probe()
            .format(
                &format.hint(),
                stream,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|err| {
                warn!(%format, error = %err, "container handshake failed");
                translate::open_error(err)
            })?;

        let reader = probed.format;

        // Select the stream-information surface: the first decodable track.
        // Anything else the container carries is ignored.
        let track = reader
            .tracks()
            .iter()
            .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| {
                BridgeError::UnsupportedFormat("no decodable audio track".to_string())
            })?;

        if !format.matches_codec(track.codec_params.codec) {
            return Err(BridgeError::UnsupportedFormat(format!(
                "stream does not carry {format} audio"
            )));
        }

        let track_id = track.id;
        let info = StreamInfo::from_params(&track.codec_params)?;

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|err| {
                warn!(%format, error = %err, "codec instantiation failed");
                translate::open_error(err)
            })?;

        info!(
            %format,
            channels = info.channels,
            sample_rate = info.sample_rate,
            total_samples = ?info.total_samples,
            "decoder session ready"
        );

        Ok(Self {
            engine: Some(Engine {
                reader,
                decoder,
                track_id,
            }),
            format,
            info,
            metadata_delivered: false,
            last_error: None,
            state: SessionState::Ready,
            position: 0,
            pending_skip: 0,
            eof: false,
        })
    }

    /// Container format this session was opened with.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Stream metadata captured at open.
    pub fn info(&self) -> &StreamInfo {
        &self.info
    }

    /// Per-channel frames decoded so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// The most recent error recorded on this session, if any.
    pub fn last_error(&self) -> Option<&BridgeError> {
        self.last_error.as_ref()
    }

    /// Whether [`close`](DecoderSession::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Decode the next frame batch and deliver it to `sink`.
    ///
    /// The first call delivers the stream metadata through
    /// [`FrameSink::on_metadata`] before any frame. A clean end of stream is
    /// reported as [`DecodeProgress::EndOfStream`] and is sticky.
    ///
    /// Recoverable frame corruption returns [`BridgeError::DecodeFailed`]
    /// while leaving the session usable; the host may keep calling to skip
    /// past the damage. Read failures and engine faults are terminal and
    /// leave the session in a failed state that replays the recorded error.
    pub fn decode_next(&mut self, sink: &mut dyn FrameSink) -> Result<DecodeProgress> {
        match self.state {
            SessionState::Closed => return Err(BridgeError::SessionClosed),
            SessionState::Failed => {
                return Err(self.last_error.clone().unwrap_or_else(|| {
                    BridgeError::InternalFault("session previously failed".to_string())
                }));
            }
            SessionState::Ready => {}
        }

        if !self.metadata_delivered {
            self.metadata_delivered = true;
            sink.on_metadata(&self.info);
        }

        if self.eof {
            return Ok(DecodeProgress::EndOfStream);
        }

        let engine = match self.engine.as_mut() {
            Some(engine) => engine,
            None => return Err(BridgeError::SessionClosed),
        };

        loop {
            let packet = match engine.reader.next_packet() {
                Ok(packet) => packet,
                Err(EngineError::IoError(err))
                    if err.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    debug!(position = self.position, "end of stream");
                    self.eof = true;
                    return Ok(DecodeProgress::EndOfStream);
                }
                Err(engine_err) => {
                    let recoverable = matches!(
                        engine_err,
                        EngineError::DecodeError(_) | EngineError::LimitError(_)
                    );
                    let err = translate::decode_error(engine_err);
                    self.last_error = Some(err.clone());
                    if recoverable {
                        warn!(error = %err, "malformed packet");
                    } else {
                        self.state = SessionState::Failed;
                        error!(error = %err, "packet read failed");
                    }
                    sink.on_error(&err);
                    return Err(err);
                }
            };

            if packet.track_id() != engine.track_id {
                continue;
            }

            match engine.decoder.decode(&packet) {
                Ok(decoded) => {
                    let total = decoded.frames();
                    if total == 0 {
                        continue;
                    }
                    if self.pending_skip >= total as u64 {
                        self.pending_skip -= total as u64;
                        continue;
                    }

                    let skip = self.pending_skip as usize;
                    self.pending_skip = 0;

                    let planes = FramePlanes::new(decoded, skip);
                    let frames = planes.frames();
                    match sink.on_frame(&planes) {
                        FlowControl::Continue => {
                            self.position += frames as u64;
                            return Ok(DecodeProgress::Frame { frames });
                        }
                        FlowControl::Abort => {
                            debug!(position = self.position, "host aborted decoding");
                            let err = BridgeError::Aborted;
                            self.last_error = Some(err.clone());
                            return Err(err);
                        }
                    }
                }
                Err(engine_err) => {
                    let recoverable = matches!(
                        engine_err,
                        EngineError::DecodeError(_) | EngineError::LimitError(_)
                    );
                    let err = translate::decode_error(engine_err);
                    self.last_error = Some(err.clone());
                    if recoverable {
                        warn!(error = %err, "frame decode failed");
                    } else {
                        self.state = SessionState::Failed;
                        error!(error = %err, "decoder fault");
                    }
                    sink.on_error(&err);
                    return Err(err);
                }
            }
        }
    }

    /// Decode until end of stream, returning the per-channel frame total.
    pub fn decode_all(&mut self, sink: &mut dyn FrameSink) -> Result<u64> {
        let mut total = 0u64;
        loop {
            match self.decode_next(sink)? {
                DecodeProgress::Frame { frames } => total += frames as u64,
                DecodeProgress::EndOfStream => return Ok(total),
            }
        }
    }

    /// Seek to an absolute sample offset.
    ///
    /// `sample_offset` counts samples across all channels, matching
    /// [`StreamInfo::total_samples`]; a stereo session seeking to offset
    /// 2000 resumes decoding at per-channel sample 1000. Seeking at or past
    /// the declared end succeeds and positions the session at end of
    /// stream.
    ///
    /// A successful seek clears any recorded error and returns a failed
    /// session to the ready state.
    pub fn seek(&mut self, sample_offset: u64) -> Result<()> {
        if self.state == SessionState::Closed {
            return Err(BridgeError::SessionClosed);
        }

        let engine = match self.engine.as_mut() {
            Some(engine) => engine,
            None => return Err(BridgeError::SessionClosed),
        };

        let channels = self.info.channels as u64;
        let target = sample_offset / channels;

        if let Some(total) = self.info.total_samples {
            if sample_offset >= total {
                debug!(sample_offset, "seek at or past end of stream");
                self.eof = true;
                self.pending_skip = 0;
                self.position = total / channels;
                self.state = SessionState::Ready;
                self.last_error = None;
                return Ok(());
            }
        }

        let seeked = engine
            .reader
            .seek(
                SeekMode::Accurate,
                SeekTo::TimeStamp {
                    ts: target,
                    track_id: engine.track_id,
                },
            )
            .map_err(|engine_err| {
                let err = translate::seek_error(engine_err, sample_offset);
                warn!(sample_offset, error = %err, "seek failed");
                self.last_error = Some(err.clone());
                err
            })?;

        engine.decoder.reset();
        self.eof = false;
        // Engines land on frame boundaries; discard the run-in so the next
        // delivered batch starts at the requested sample.
        self.pending_skip = seeked.required_ts.saturating_sub(seeked.actual_ts);
        self.position = seeked.required_ts;
        self.state = SessionState::Ready;
        self.last_error = None;

        debug!(
            required = seeked.required_ts,
            actual = seeked.actual_ts,
            "seek complete"
        );
        Ok(())
    }

    /// Release the engine handle.
    ///
    /// Idempotent: the handle is deallocated exactly once no matter how
    /// often this is called, and calling it from a failed session is safe.
    /// Afterwards every decode and seek fails fast with
    /// [`BridgeError::SessionClosed`].
    pub fn close(&mut self) {
        if self.engine.take().is_some() {
            debug!(position = self.position, "decoder session closed");
        }
        self.state = SessionState::Closed;
    }
}
