use crate::error::AquaforgeError;
use aquaforge_schemas::settings::ChannelOrder;
use image::RgbImage;
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// An 8-bit, three-channel image that remembers which order its channels are in.
///
/// Decoders hand out RGB; some detection models want BGR. Conversions between
/// the two are explicit so a buffer is never fed to a model, or shown to a
/// user, in the wrong order.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    order: ChannelOrder,
    pixels: RgbImage,
}

impl Frame {
    pub fn from_rgb(pixels: RgbImage) -> Self {
        Self { order: ChannelOrder::Rgb, pixels }
    }

    /// Decodes a jpg/jpeg/png file into an RGB frame.
    pub fn open(path: &Path) -> Result<Self, AquaforgeError> {
        check_extension(path)?;
        let decoded = image::open(path).map_err(|e| AquaforgeError::ImageDecode(path.to_path_buf(), e))?;
        Ok(Self::from_rgb(decoded.to_rgb8()))
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut RgbImage {
        &mut self.pixels
    }

    /// Reorders channels in place if the frame is not already in `target` order.
    pub fn into_order(mut self, target: ChannelOrder) -> Self {
        if self.order != target {
            for pixel in self.pixels.pixels_mut() {
                pixel.0.swap(0, 2);
            }
            self.order = target;
        }
        self
    }

    /// Returns the buffer in RGB order, converting if needed.
    pub fn into_rgb(self) -> RgbImage {
        self.into_order(ChannelOrder::Rgb).pixels
    }
}

pub fn check_extension(path: &Path) -> Result<(), AquaforgeError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(AquaforgeError::UnsupportedImageType(path.display().to_string()))
    }
}

/// Writes an RGB buffer; the format follows the file extension.
pub fn save_rgb(image: &RgbImage, path: &Path) -> Result<(), AquaforgeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AquaforgeError::FileIO(parent.display().to_string(), e))?;
    }
    image
        .save(path)
        .map_err(|e| AquaforgeError::ImageEncode(path.to_path_buf(), e))
}
