use serde::{Deserialize, Serialize};
use std::fmt;

/// One region flagged by the detection model, in source-image pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
    pub confidence: f32,
    pub class_id: usize,
}

impl BoundingBox {
    pub fn width(&self) -> f32 {
        (self.x_max - self.x_min).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y_max - self.y_min).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Intersection-over-union with another box. Zero when either box is empty.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let ix = (self.x_max.min(other.x_max) - self.x_min.max(other.x_min)).max(0.0);
        let iy = (self.y_max.min(other.y_max) - self.y_min.max(other.y_min)).max(0.0);
        let intersection = ix * iy;
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BloomSeverity {
    None,
    Mild,
    Moderate,
    Severe,
}

impl BloomSeverity {
    pub fn is_bloom(&self) -> bool {
        !matches!(self, BloomSeverity::None)
    }
}

impl fmt::Display for BloomSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BloomSeverity::None => "NONE",
            BloomSeverity::Mild => "MILD",
            BloomSeverity::Moderate => "MODERATE",
            BloomSeverity::Severe => "SEVERE",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloomSeverityVerdict {
    pub region_count: usize,
    pub severity: BloomSeverity,
    pub guidance: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> BoundingBox {
        BoundingBox { x_min, y_min, x_max, y_max, confidence: 0.9, class_id: 0 }
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = bbox(10.0, 10.0, 20.0, 20.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let b = bbox(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn iou_of_half_overlap() {
        let a = bbox(0.0, 0.0, 10.0, 10.0);
        let b = bbox(5.0, 0.0, 15.0, 10.0);
        // 50 / (100 + 100 - 50)
        assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_box_has_no_area() {
        let a = bbox(10.0, 10.0, 5.0, 5.0);
        assert_eq!(a.area(), 0.0);
        assert_eq!(a.iou(&a), 0.0);
    }
}
