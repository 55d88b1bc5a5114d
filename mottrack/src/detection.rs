//! Detector output records fed into the tracker

use crate::bbox::BBox;

/// One object detection for a single frame.
///
/// Produced by an external detector; the tracker assumes class filtering
/// and NMS have already been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: BBox,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f32,
    pub class_id: u32,
    /// Human-readable class label, may be empty.
    pub class_name: String,
}

impl Detection {
    pub fn new(bbox: BBox, confidence: f32, class_id: u32, class_name: impl Into<String>) -> Self {
        Self {
            bbox,
            confidence,
            class_id,
            class_name: class_name.into(),
        }
    }

    /// A detection with a negative extent carries no usable measurement.
    /// Zero-sized boxes are accepted; they just never overlap anything.
    pub fn is_valid(&self) -> bool {
        self.bbox.w >= 0 && self.bbox.h >= 0
    }
}
