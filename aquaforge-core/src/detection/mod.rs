//! Boundary around the pretrained algal bloom detector.
//!
//! The model itself is opaque: it takes a frame in the channel order it was
//! trained on and returns bounding boxes. [`DetectionInvoker`] owns the single
//! lazily loaded model instance, performs the channel conversions on either
//! side of the call and reports every outcome as a [`DetectionOutcome`] value.

pub mod annotate;
pub mod frame;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod postprocess;

use crate::error::AquaforgeError;
use aquaforge_schemas::{bloom::BoundingBox, settings::ModelSettings};
use frame::Frame;
use image::RgbImage;
use std::cell::OnceCell;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Whether this build can run the detector at all. Decided once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionCapability {
    Available,
    Unavailable(String),
}

impl DetectionCapability {
    pub fn for_build() -> Self {
        if cfg!(feature = "onnx") {
            DetectionCapability::Available
        } else {
            DetectionCapability::Unavailable(
                "this build has no inference backend; rebuild with `--features onnx`".to_string(),
            )
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DetectionCapability::Available)
    }
}

/// A loaded detector. Implementations must not keep state between calls.
pub trait BloomModel {
    fn detect(&self, frame: &Frame) -> Result<Vec<BoundingBox>, AquaforgeError>;
}

/// Turns a model artifact on disk into a [`BloomModel`].
pub trait ModelLoader {
    type Model: BloomModel;

    fn load(&self, settings: &ModelSettings) -> Result<Self::Model, AquaforgeError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    pub region_count: usize,
    pub regions: Vec<BoundingBox>,
    /// Source image with region overlays, RGB order.
    pub annotated_image: RgbImage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetectionOutcome {
    Success(DetectionResult),
    ArtifactNotFound(PathBuf),
    InferenceFailure(String),
}

/// Runs one detection per call against a model that is loaded on first use.
///
/// A failed load is not remembered, so a later call picks up a model artifact
/// that has been put in place since.
pub struct DetectionInvoker<L: ModelLoader> {
    loader: L,
    settings: ModelSettings,
    model: OnceCell<L::Model>,
}

impl<L: ModelLoader> DetectionInvoker<L> {
    pub fn new(loader: L, settings: ModelSettings) -> Self {
        Self { loader, settings, model: OnceCell::new() }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    pub fn analyze(&self, image: RgbImage) -> DetectionOutcome {
        match self.try_analyze(image) {
            Ok(result) => DetectionOutcome::Success(result),
            Err(AquaforgeError::ArtifactNotFound(path)) => {
                warn!(path = %path.display(), "detection model artifact missing");
                DetectionOutcome::ArtifactNotFound(path)
            }
            Err(e) => {
                warn!(error = %e, "detection failed");
                DetectionOutcome::InferenceFailure(e.to_string())
            }
        }
    }

    fn try_analyze(&self, image: RgbImage) -> Result<DetectionResult, AquaforgeError> {
        let model = self.model()?;

        let mut frame = Frame::from_rgb(image).into_order(self.settings.channel_order);
        let started = Instant::now();
        let regions = model.detect(&frame)?;
        info!(
            regions = regions.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "inference complete"
        );

        annotate::draw_regions(&mut frame, &regions, &self.settings.label)?;

        Ok(DetectionResult {
            region_count: regions.len(),
            regions,
            annotated_image: frame.into_rgb(),
        })
    }

    fn model(&self) -> Result<&L::Model, AquaforgeError> {
        if let Some(model) = self.model.get() {
            debug!("using cached detection model");
            return Ok(model);
        }

        let path = &self.settings.path;
        if !path.is_file() {
            return Err(AquaforgeError::ArtifactNotFound(path.clone()));
        }
        info!(path = %path.display(), "loading detection model");
        let model = self.loader.load(&self.settings)?;
        Ok(self.model.get_or_init(|| model))
    }
}

#[cfg(feature = "onnx")]
pub type DefaultLoader = onnx::OnnxLoader;

#[cfg(not(feature = "onnx"))]
pub type DefaultLoader = UnavailableLoader;

/// Stand-in loader for builds without an inference backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableLoader;

/// Never constructed; exists so [`UnavailableLoader`] can name a model type.
#[derive(Debug)]
pub enum NoModel {}

impl BloomModel for NoModel {
    fn detect(&self, _frame: &Frame) -> Result<Vec<BoundingBox>, AquaforgeError> {
        match *self {}
    }
}

impl ModelLoader for UnavailableLoader {
    type Model = NoModel;

    fn load(&self, _settings: &ModelSettings) -> Result<NoModel, AquaforgeError> {
        match DetectionCapability::for_build() {
            DetectionCapability::Unavailable(reason) => Err(AquaforgeError::DetectionUnavailable(reason)),
            DetectionCapability::Available => Err(AquaforgeError::DetectionUnavailable(
                "no inference backend registered".to_string(),
            )),
        }
    }
}
