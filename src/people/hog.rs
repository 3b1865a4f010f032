//! OpenCV-backed video source, HOG people detector and window display.

use super::{BoundingBox, Flow, FrameDetections, FrameSink, FrameSource, PersonDetector};
use super::{FRAME_HEIGHT, FRAME_WIDTH};
use crate::{Error, Result};
use opencv::core::{Mat, Point, Rect, Scalar, Size, Vector};
use opencv::prelude::*;
use opencv::{highgui, imgproc, objdetect, videoio};
use std::path::Path;

/// Sequential reader over a local video file; frames come out resized to
/// [`FRAME_WIDTH`]×[`FRAME_HEIGHT`].
pub struct VideoFileSource {
    capture: videoio::VideoCapture,
    size: Size,
}

impl VideoFileSource {
    pub fn open(path: &Path) -> Result<Self> {
        let path_str = path.to_string_lossy();
        let capture = videoio::VideoCapture::from_file(&path_str, videoio::CAP_ANY)?;

        if !capture.is_opened()? {
            return Err(Error::Video(format!(
                "could not open video source {}",
                path.display()
            )));
        }

        tracing::info!("Opened video source {}", path.display());
        Ok(Self {
            capture,
            size: Size::new(FRAME_WIDTH, FRAME_HEIGHT),
        })
    }
}

impl FrameSource for VideoFileSource {
    type Frame = Mat;

    fn read_frame(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }

        let mut resized = Mat::default();
        imgproc::resize(&frame, &mut resized, self.size, 0.0, 0.0, imgproc::INTER_LINEAR)?;
        Ok(Some(resized))
    }

    fn release(&mut self) -> Result<()> {
        self.capture.release()?;
        Ok(())
    }
}

/// `detectMultiScale` parameters.
#[derive(Debug, Clone, Copy)]
pub struct HogParams {
    pub win_stride: Size,
    pub padding: Size,
    pub scale: f64,
    pub hit_threshold: f64,
    pub group_threshold: f64,
}

impl Default for HogParams {
    fn default() -> Self {
        Self {
            win_stride: Size::new(4, 4),
            padding: Size::new(8, 8),
            scale: 1.05,
            hit_threshold: 0.0,
            group_threshold: 2.0,
        }
    }
}

/// HOG descriptor loaded with OpenCV's default people SVM.
pub struct HogPeopleDetector {
    hog: objdetect::HOGDescriptor,
    params: HogParams,
}

impl HogPeopleDetector {
    pub fn new(params: HogParams) -> Result<Self> {
        let mut hog = objdetect::HOGDescriptor::default()?;
        hog.set_svm_detector(&objdetect::HOGDescriptor::get_default_people_detector()?)?;
        Ok(Self { hog, params })
    }
}

impl PersonDetector<Mat> for HogPeopleDetector {
    fn detect(&mut self, frame: &Mat) -> Result<FrameDetections> {
        let mut gray = Mat::default();
        imgproc::cvt_color(frame, &mut gray, imgproc::COLOR_BGR2GRAY, 0)?;

        let mut found = Vector::<Rect>::new();
        let mut weights = Vector::<f64>::new();
        self.hog.detect_multi_scale_weights(
            &gray,
            &mut found,
            &mut weights,
            self.params.hit_threshold,
            self.params.win_stride,
            self.params.padding,
            self.params.scale,
            self.params.group_threshold,
            false,
        )?;

        Ok(FrameDetections {
            boxes: found
                .iter()
                .map(|r| BoundingBox::new(r.x, r.y, r.width, r.height))
                .collect(),
            weights: weights.to_vec(),
        })
    }
}

/// Draws detections onto the frame and shows it in a HighGUI window. Pressing `q`
/// stops the run.
pub struct WindowDisplay {
    title: String,
}

impl WindowDisplay {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl FrameSink<Mat> for WindowDisplay {
    fn present(&mut self, frame: &mut Mat, detections: &FrameDetections) -> Result<Flow> {
        let green = Scalar::new(0.0, 255.0, 0.0, 0.0);
        let white = Scalar::new(255.0, 255.0, 255.0, 0.0);

        for b in &detections.boxes {
            imgproc::rectangle(
                &mut *frame,
                Rect::new(b.x, b.y, b.width, b.height),
                green,
                2,
                imgproc::LINE_8,
                0,
            )?;
        }

        imgproc::put_text(
            &mut *frame,
            &detections.label(),
            Point::new(10, 30),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.7,
            white,
            2,
            imgproc::LINE_8,
            false,
        )?;

        highgui::imshow(&self.title, &*frame)?;

        let key = highgui::wait_key(1)?;
        if key & 0xFF == i32::from(b'q') {
            Ok(Flow::Stop)
        } else {
            Ok(Flow::Continue)
        }
    }

    fn close(&mut self) -> Result<()> {
        highgui::destroy_all_windows()?;
        Ok(())
    }
}
