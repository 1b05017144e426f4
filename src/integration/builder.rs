//! Builder for creating Detection objects from various input formats.

use crate::analytics::{ClassLabel, Detection, Rect, TrackId};

/// Builder for creating `Detection` objects from various input formats.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    bbox: Rect,
    class: Option<ClassLabel>,
    confidence: f32,
    track_id: TrackId,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        self.bbox = Rect::new(x1, y1, x2, y2);
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    ///
    /// `w` and `h` are pixel counts, so the box spans exactly `w` x `h` pixels.
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::from_tlwh(
            (cx - w / 2.0).round() as i32,
            (cy - h / 2.0).round() as i32,
            w.round() as i32,
            h.round() as i32,
        );
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, l: i32, t: i32, w: i32, h: i32) -> Self {
        self.bbox = Rect::from_tlwh(l, t, w, h);
        self
    }

    /// Set the class label.
    pub fn class(mut self, class: impl Into<ClassLabel>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Set the confidence score.
    pub fn confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the upstream tracker id.
    pub fn track_id(mut self, track_id: TrackId) -> Self {
        self.track_id = track_id;
        self
    }

    /// Build the final `Detection`. Unlabelled detections get an empty class.
    pub fn build(self) -> Detection {
        Detection::new(
            self.bbox,
            self.class.unwrap_or_else(|| ClassLabel::new("")),
            self.confidence,
            self.track_id,
        )
    }
}
