use super::frame::Frame;
use crate::error::AquaforgeError;
use aquaforge_schemas::{bloom::BoundingBox, settings::ChannelOrder};
use plotters::prelude::*;
use tracing::warn;

const BOX_COLOR: RGBColor = RGBColor(220, 53, 69);
const STROKE_WIDTH: u32 = 3;
const LABEL_SIZE: u32 = 16;

/// Draws one rectangle and a confidence label per region onto the frame.
///
/// The overlay colour is expressed in RGB and reordered to match the frame, so
/// the result looks the same whichever order the model worked in.
pub fn draw_regions(frame: &mut Frame, regions: &[BoundingBox], label: &str) -> Result<(), AquaforgeError> {
    if regions.is_empty() {
        return Ok(());
    }
    let color = match frame.order() {
        ChannelOrder::Rgb => BOX_COLOR,
        ChannelOrder::Bgr => RGBColor(BOX_COLOR.2, BOX_COLOR.1, BOX_COLOR.0),
    };
    let (width, height) = (frame.width(), frame.height());
    let max_x = width.saturating_sub(1) as i32;
    let max_y = height.saturating_sub(1) as i32;

    let buffer: &mut [u8] = frame.pixels_mut();
    let root = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();

    for region in regions {
        let x0 = (region.x_min.round() as i32).clamp(0, max_x);
        let y0 = (region.y_min.round() as i32).clamp(0, max_y);
        let x1 = (region.x_max.round() as i32).clamp(0, max_x);
        let y1 = (region.y_max.round() as i32).clamp(0, max_y);

        root.draw(&Rectangle::new([(x0, y0), (x1, y1)], color.stroke_width(STROKE_WIDTH)))
            .map_err(|e| AquaforgeError::Annotation(e.to_string()))?;

        let caption = format!("{} {:.2}", label, region.confidence);
        let text_y = (y0 - LABEL_SIZE as i32 - 2).max(0);
        let style = ("sans-serif", LABEL_SIZE).into_font().color(&color);
        // Fonts may be missing on headless hosts; boxes alone are still useful.
        if let Err(e) = root.draw(&Text::new(caption, (x0, text_y), style)) {
            warn!(error = %e, "could not render detection label");
        }
    }

    root.present().map_err(|e| AquaforgeError::Annotation(e.to_string()))?;
    Ok(())
}
