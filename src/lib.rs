//! # Codec Bridge
//!
//! Callback bridge between host-supplied byte streams and an opaque audio
//! decode engine, for FLAC and Ogg-Vorbis data.
//!
//! ## Overview
//!
//! A host program supplies a small pull-based capability set over whatever
//! backs its data (memory, a socket, a virtual filesystem); this crate wires
//! that capability set into the engine, and hands back decoded PCM sample
//! planes, a one-shot metadata snapshot, and errors normalized into a small
//! stable vocabulary. The engine never learns where the bytes come from, and
//! the host never observes an engine-native status code.
//!
//! ```text
//! StreamOps -> OpsSource -> engine (probe/reader/decoder) -> FramePlanes -> FrameSink
//!                                          |
//!                                          +-> StreamInfo (once)
//!                                          +-> BridgeError (translated)
//! ```
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use codec_bridge::{
//!     DecoderSession, FlowControl, Format, FramePlanes, FrameSink, MemoryStream, StreamInfo,
//! };
//!
//! struct Collector {
//!     samples: Vec<i32>,
//! }
//!
//! impl FrameSink for Collector {
//!     fn on_metadata(&mut self, info: &StreamInfo) {
//!         println!("{} Hz, {} channels", info.sample_rate, info.channels);
//!     }
//!
//!     fn on_frame(&mut self, frame: &FramePlanes<'_>) -> FlowControl {
//!         // The planes are only valid inside this callback; copy what
//!         // should outlive it.
//!         self.samples.extend(frame.copy_interleaved());
//!         FlowControl::Continue
//!     }
//! }
//!
//! fn main() -> codec_bridge::Result<()> {
//!     let data = std::fs::read("track.flac").expect("readable fixture");
//!     let mut session = DecoderSession::open(Format::Flac, MemoryStream::from_vec(data))?;
//!
//!     let mut sink = Collector { samples: Vec::new() };
//!     let frames = session.decode_all(&mut sink)?;
//!     println!("decoded {frames} frames per channel");
//!
//!     session.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Threading Model
//!
//! The bridge is synchronous and callback-driven: the engine calls the I/O
//! adapter and the frame sink inline on the thread driving
//! [`DecoderSession::decode_next`]. Sessions are `Send`; run concurrent
//! decodes on separate sessions, one per thread. Each session owns its error
//! record, so sessions never observe each other's failures.
//!
//! ## Resource Model
//!
//! The engine handle is exclusively owned by its session and released
//! exactly once, on [`DecoderSession::close`] or drop, on every exit path
//! including a failed open. The stream operations are owned by the session
//! for its whole lifetime, so the engine can never read through a dangling
//! capability set.

mod adapter;
pub mod error;
pub mod format;
pub mod frame;
pub mod metadata;
pub mod ops;
pub mod session;
mod translate;

pub use error::{BridgeError, Result};
pub use format::{detect_format, Format};
pub use frame::{FlowControl, FramePlanes, FrameSink};
pub use metadata::StreamInfo;
pub use ops::{IoStream, MemoryStream, StreamOps};
pub use session::{DecodeProgress, DecoderSession};
