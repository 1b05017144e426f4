use nalgebra::Point2;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Axis-aligned pixel box in TLBR format.
///
/// Coordinates are inclusive pixel indices: a box spanning `x1..=x2` is
/// `x2 - x1 + 1` pixels wide. Every overlap ratio in the crate uses this
/// convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct Rect {
    /// Top-left x coordinate
    pub x1: i32,
    /// Top-left y coordinate
    pub y1: i32,
    /// Bottom-right x coordinate
    pub x2: i32,
    /// Bottom-right y coordinate
    pub y2: i32,
}

impl Rect {
    #[inline]
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn from_tlwh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width - 1, y + height - 1)
    }

    /// Inclusive width in pixels, zero for degenerate boxes.
    #[inline]
    pub fn width(&self) -> i64 {
        (self.x2 as i64 - self.x1 as i64 + 1).max(0)
    }

    /// Inclusive height in pixels, zero for degenerate boxes.
    #[inline]
    pub fn height(&self) -> i64 {
        (self.y2 as i64 - self.y1 as i64 + 1).max(0)
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// Bottom-center of the box, the point used for counting and congestion.
    #[inline]
    pub fn anchor(&self) -> Point2<f32> {
        let cx = (self.x1 as i64 + self.x2 as i64).div_euclid(2);
        Point2::new(cx as f32, self.y2 as f32)
    }

    /// Area shared with `other`, zero when the boxes are disjoint.
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        let x1 = self.x1.max(other.x1) as i64;
        let y1 = self.y1.max(other.y1) as i64;
        let x2 = self.x2.min(other.x2) as i64;
        let y2 = self.y2.min(other.y2) as i64;

        (x2 - x1 + 1).max(0) * (y2 - y1 + 1).max(0)
    }

    #[inline]
    pub fn to_tlbr(&self) -> [i32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

impl From<[i32; 4]> for Rect {
    fn from(v: [i32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Rect> for [i32; 4] {
    fn from(r: Rect) -> Self {
        r.to_tlbr()
    }
}

/// Intersection over union of two boxes, in `[0, 1]`.
pub fn overlap_ratio_iou(a: &Rect, b: &Rect) -> f32 {
    let inter_area = a.intersection_area(b);
    let union_area = a.area() + b.area() - inter_area;

    if union_area > 0 {
        inter_area as f32 / union_area as f32
    } else {
        0.0
    }
}

/// Fraction of `small` that lies inside `large`. Not symmetric.
pub fn contained_ratio_ioa(small: &Rect, large: &Rect) -> f32 {
    let small_area = small.area();
    if small_area > 0 {
        small.intersection_area(large) as f32 / small_area as f32
    } else {
        0.0
    }
}

/// Calculate IoU matrix between two sets of bounding boxes.
///
/// Returns a matrix of shape (M, N) where M is the length of `boxes_a`
/// and N is the length of `boxes_b`.
pub fn iou_batch(boxes_a: &[Rect], boxes_b: &[Rect]) -> Array2<f32> {
    let mut ious = Array2::zeros((boxes_a.len(), boxes_b.len()));
    for (i, a) in boxes_a.iter().enumerate() {
        for (j, b) in boxes_b.iter().enumerate() {
            ious[[i, j]] = overlap_ratio_iou(a, b);
        }
    }
    ious
}
