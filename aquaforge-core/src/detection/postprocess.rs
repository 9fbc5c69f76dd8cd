//! Turns raw single-stage detector output into bounding boxes.
//!
//! The expected layout is the YOLOv8 head: `[4 + classes, anchors]`, channel
//! major, where the first four rows are centre-x, centre-y, width and height
//! in network-input pixels and the remaining rows are per-class scores.

use aquaforge_schemas::{bloom::BoundingBox, settings::ModelSettings};
use std::cmp::Ordering;

/// Borrowed view over one image's worth of head output.
#[derive(Debug, Clone, Copy)]
pub struct HeadOutput<'a> {
    data: &'a [f32],
    channels: usize,
    anchors: usize,
}

impl<'a> HeadOutput<'a> {
    /// Returns `None` if the buffer does not match the given shape or has no class rows.
    pub fn new(data: &'a [f32], channels: usize, anchors: usize) -> Option<Self> {
        if channels <= 4 || data.len() != channels * anchors {
            return None;
        }
        Some(Self { data, channels, anchors })
    }

    fn at(&self, channel: usize, anchor: usize) -> f32 {
        self.data[channel * self.anchors + anchor]
    }

    pub fn classes(&self) -> usize {
        self.channels - 4
    }
}

/// Picks candidate boxes above the confidence threshold, rescales them to the
/// source image and suppresses overlaps.
pub fn decode(head: HeadOutput<'_>, settings: &ModelSettings, scale: (f32, f32)) -> Vec<BoundingBox> {
    let (sx, sy) = scale;
    let mut candidates = Vec::new();

    for anchor in 0..head.anchors {
        let best = match settings.bloom_class_id {
            Some(class_id) if class_id < head.classes() => Some((class_id, head.at(4 + class_id, anchor))),
            Some(_) => None,
            None => (0..head.classes())
                .map(|c| (c, head.at(4 + c, anchor)))
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal)),
        };
        let Some((class_id, confidence)) = best else {
            continue;
        };
        if confidence < settings.confidence_threshold {
            continue;
        }

        let (cx, cy) = (head.at(0, anchor), head.at(1, anchor));
        let (w, h) = (head.at(2, anchor), head.at(3, anchor));
        candidates.push(BoundingBox {
            x_min: (cx - w / 2.0) * sx,
            y_min: (cy - h / 2.0) * sy,
            x_max: (cx + w / 2.0) * sx,
            y_max: (cy + h / 2.0) * sy,
            confidence,
            class_id,
        });
    }

    non_max_suppression(candidates, settings.iou_threshold)
}

/// Greedy per-class NMS; output is ordered by descending confidence.
pub fn non_max_suppression(mut boxes: Vec<BoundingBox>, iou_threshold: f32) -> Vec<BoundingBox> {
    boxes.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal));
    let mut kept: Vec<BoundingBox> = Vec::with_capacity(boxes.len());
    for candidate in boxes {
        let overlaps = kept
            .iter()
            .any(|k| k.class_id == candidate.class_id && k.iou(&candidate) > iou_threshold);
        if !overlaps {
            kept.push(candidate);
        }
    }
    kept
}
