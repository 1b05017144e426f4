//! Detection records delivered by the external detector/tracker.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analytics::rect::Rect;

/// Identifier assigned by the upstream tracker.
pub type TrackId = u64;

/// Categorical object class, e.g. `car` or `person`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassLabel(String);

impl ClassLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassLabel {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClassLabel {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// One tracked detection in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box in TLBR format (x1, y1, x2, y2)
    pub bbox: Rect,
    /// Class label; replaced by the smoothed label once processed
    pub class: ClassLabel,
    /// Detection confidence score
    pub confidence: f32,
    /// Persistent identifier from the upstream tracker
    pub track_id: TrackId,
}

impl Detection {
    pub fn new(
        bbox: Rect,
        class: impl Into<ClassLabel>,
        confidence: f32,
        track_id: TrackId,
    ) -> Self {
        Self {
            bbox,
            class: class.into(),
            confidence,
            track_id,
        }
    }
}
