use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AquaforgeError {
    #[error("{} not found in project folder.", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("Algal bloom detection is unavailable: {0}")]
    DetectionUnavailable(String),

    #[error("Failed to load detection model '{0}': {1}")]
    ModelLoad(PathBuf, String),

    #[error("{0}")]
    Inference(String),

    #[error("Failed to draw detection overlay: {0}")]
    Annotation(String),

    #[error("Failed to decode image '{0}': {1}")]
    ImageDecode(PathBuf, #[source] image::ImageError),

    #[error("Failed to write image '{0}': {1}")]
    ImageEncode(PathBuf, #[source] image::ImageError),

    #[error("Unsupported image type '{0}' (expected jpg, jpeg or png)")]
    UnsupportedImageType(String),

    #[error("Failed to process CSV from '{0}': {1}")]
    CsvError(String, #[source] csv::Error),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),
}
