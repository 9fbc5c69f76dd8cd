use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Byte order of the three colour channels in an image buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelOrder::Rgb => f.write_str("rgb"),
            ChannelOrder::Bgr => f.write_str("bgr"),
        }
    }
}

/// Where the pretrained bloom detector lives and how to drive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub path: PathBuf,
    /// Channel order the model was trained on.
    pub channel_order: ChannelOrder,
    /// Side length of the square network input.
    pub input_size: u32,
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    /// Only count this class; `None` counts every detected box.
    pub bloom_class_id: Option<usize>,
    pub label: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("algaldetection.onnx"),
            channel_order: ChannelOrder::Bgr,
            input_size: 640,
            confidence_threshold: 0.25,
            iou_threshold: 0.7,
            bloom_class_id: None,
            label: "algal bloom".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: ModelSettings,
    /// Directory for annotated detection images.
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
            output_dir: PathBuf::from("./data/detections"),
        }
    }
}
