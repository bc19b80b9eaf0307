//! # Decode Demo
//!
//! Decodes an audio file through the callback bridge and prints stream
//! statistics, exercising format detection, metadata capture, and frame
//! marshalling end to end.
//!
//! Run with: `cargo run --example decode_demo -- path/to/track.flac`

use std::fs::File;

use codec_bridge::{
    DecoderSession, FlowControl, FramePlanes, FrameSink, IoStream, StreamInfo,
};

struct StatsSink {
    frames: u64,
    batches: u64,
    peak: i32,
    info: Option<StreamInfo>,
}

impl StatsSink {
    fn new() -> Self {
        Self {
            frames: 0,
            batches: 0,
            peak: 0,
            info: None,
        }
    }
}

impl FrameSink for StatsSink {
    fn on_metadata(&mut self, info: &StreamInfo) {
        println!(
            "stream: {} Hz, {} channels, {} total samples",
            info.sample_rate,
            info.channels,
            info.total_samples
                .map_or_else(|| "unknown".to_string(), |total| total.to_string()),
        );
        self.info = Some(info.clone());
    }

    fn on_frame(&mut self, frame: &FramePlanes<'_>) -> FlowControl {
        self.frames += frame.frames() as u64;
        self.batches += 1;
        for channel in 0..frame.channels() {
            for index in 0..frame.frames() {
                self.peak = self.peak.max(frame.sample(channel, index).saturating_abs());
            }
        }
        FlowControl::Continue
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .ok_or("usage: decode_demo <file.flac|file.ogg>")?;

    let stream = IoStream::new(File::open(&path)?)?;
    let mut session = DecoderSession::open_detect(stream)?;
    println!("container: {}", session.format());

    let mut sink = StatsSink::new();
    let total = session.decode_all(&mut sink)?;

    println!(
        "decoded {} frames per channel in {} batches, peak amplitude {}",
        total, sink.batches, sink.peak
    );

    if let Some(info) = &sink.info {
        if let Some(declared) = info.per_channel_samples() {
            if declared != total {
                println!("note: stream declared {declared} frames per channel");
            }
        }
    }

    session.close();
    Ok(())
}
