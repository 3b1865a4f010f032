//! Pedestrian counting over video frames
//!
//! The run loop is written against three small seams: a [`FrameSource`] yielding
//! frames until exhaustion, a [`PersonDetector`] returning candidate rectangles for a
//! frame, and a [`FrameSink`] that overlays and displays results and may ask to stop.
//! The OpenCV implementations live in `hog` behind the `detector` feature.
//!
//! Counts are summed per frame with no tracking across frames, so one person visible
//! in N frames contributes N to the total.

#[cfg(feature = "detector")]
pub mod hog;

use crate::Result;
use tracing::{debug, info, warn};

/// Frames are resized to this resolution before detection.
pub const FRAME_WIDTH: i32 = 640;
pub const FRAME_HEIGHT: i32 = 480;

/// Axis-aligned bounding rectangle in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Opposite corner, `(x + width, y + height)`.
    pub fn bottom_right(&self) -> (i32, i32) {
        (self.x + self.width, self.y + self.height)
    }
}

/// Detector output for one frame: rectangles with their confidence weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameDetections {
    pub boxes: Vec<BoundingBox>,
    pub weights: Vec<f64>,
}

impl FrameDetections {
    pub fn count(&self) -> usize {
        self.boxes.len()
    }

    /// Overlay text drawn on each frame.
    pub fn label(&self) -> String {
        format!("People detected: {}", self.count())
    }
}

/// Running total of per-frame detections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeopleCounter {
    frames: u64,
    total: u64,
}

impl PeopleCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one frame's detections; returns that frame's count.
    pub fn record(&mut self, detections: &FrameDetections) -> usize {
        let count = detections.count();
        self.frames += 1;
        self.total += count as u64;
        count
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Whether the loop should keep reading frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub trait FrameSource {
    type Frame;

    /// Next frame, or `None` once the source is exhausted or a frame cannot be
    /// grabbed.
    fn read_frame(&mut self) -> Result<Option<Self::Frame>>;

    /// Release the underlying device or file.
    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}

pub trait PersonDetector<F> {
    fn detect(&mut self, frame: &F) -> Result<FrameDetections>;
}

pub trait FrameSink<F> {
    /// Overlay `detections` on `frame` and present it.
    fn present(&mut self, frame: &mut F, detections: &FrameDetections) -> Result<Flow>;

    /// Close any display resources.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// How the frame loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ending {
    Exhausted,
    StoppedByUser,
    ReadFailed,
}

/// Outcome of a [`run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub total_detections: u64,
    pub stopped_by_user: bool,
    /// The source failed to deliver a frame; counts cover the frames before it.
    pub read_failed: bool,
}

/// Read, detect, present and count until the source runs dry, a frame cannot be
/// read, or the sink asks to stop. A read failure ends the run like exhaustion and
/// is flagged in the summary; detector and sink failures are returned as errors.
/// The sink is closed and the source released on every exit path.
pub fn run<S, D, K>(source: &mut S, detector: &mut D, sink: &mut K) -> Result<RunSummary>
where
    S: FrameSource,
    D: PersonDetector<S::Frame>,
    K: FrameSink<S::Frame>,
{
    let mut counter = PeopleCounter::new();
    let outcome = process_frames(source, detector, sink, &mut counter);

    let closed = sink.close();
    let released = source.release();

    let ending = outcome?;
    closed?;
    released?;

    let summary = RunSummary {
        frames: counter.frames(),
        total_detections: counter.total(),
        stopped_by_user: ending == Ending::StoppedByUser,
        read_failed: ending == Ending::ReadFailed,
    };
    info!(
        "Processed {} frames, {} detections in total",
        summary.frames, summary.total_detections
    );
    Ok(summary)
}

fn process_frames<S, D, K>(
    source: &mut S,
    detector: &mut D,
    sink: &mut K,
    counter: &mut PeopleCounter,
) -> Result<Ending>
where
    S: FrameSource,
    D: PersonDetector<S::Frame>,
    K: FrameSink<S::Frame>,
{
    loop {
        let mut frame = match source.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                info!("No more frames to read");
                return Ok(Ending::Exhausted);
            }
            Err(e) => {
                warn!("Failed to read frame {}: {}", counter.frames() + 1, e);
                return Ok(Ending::ReadFailed);
            }
        };

        let detections = detector.detect(&frame)?;
        let count = counter.record(&detections);
        debug!("Frame {}: {} people", counter.frames(), count);

        if sink.present(&mut frame, &detections)? == Flow::Stop {
            info!("Stopped by user after {} frames", counter.frames());
            return Ok(Ending::StoppedByUser);
        }
    }
}
