//! Suppression of rider detections that duplicate their vehicle.

use tracing::debug;

use crate::analytics::detection::{ClassLabel, Detection};
use crate::analytics::rect::{Rect, iou_batch};

/// Drops rider detections (e.g. `person`) overlapping a carrier detection
/// (e.g. `motorcycle`) by more than `iou_threshold`. The carrier is kept.
#[derive(Debug, Clone)]
pub struct MergeFilter {
    pub rider_class: ClassLabel,
    pub carrier_class: ClassLabel,
    pub iou_threshold: f32,
}

impl MergeFilter {
    pub fn new(rider_class: ClassLabel, carrier_class: ClassLabel, iou_threshold: f32) -> Self {
        Self {
            rider_class,
            carrier_class,
            iou_threshold,
        }
    }

    /// Indices of detections to drop.
    ///
    /// Pairs are visited in index order; a detection already suppressed takes
    /// no part in later pairs.
    pub fn suppressed(&self, detections: &[Detection]) -> Vec<bool> {
        let n = detections.len();
        let mut suppressed = vec![false; n];
        if n < 2 {
            return suppressed;
        }

        let rects: Vec<Rect> = detections.iter().map(|d| d.bbox).collect();
        let ious = iou_batch(&rects, &rects);

        for i in 0..n {
            for j in (i + 1)..n {
                if suppressed[i] || suppressed[j] {
                    continue;
                }

                let rider = match (&detections[i].class, &detections[j].class) {
                    (a, b) if *a == self.rider_class && *b == self.carrier_class => i,
                    (a, b) if *a == self.carrier_class && *b == self.rider_class => j,
                    _ => continue,
                };

                if ious[[i, j]] > self.iou_threshold {
                    debug!(
                        track_id = detections[rider].track_id,
                        iou = ious[[i, j]],
                        "suppressing rider detection"
                    );
                    suppressed[rider] = true;
                }
            }
        }

        suppressed
    }

    pub fn apply(&self, detections: Vec<Detection>) -> Vec<Detection> {
        let suppressed = self.suppressed(&detections);
        detections
            .into_iter()
            .zip(suppressed)
            .filter_map(|(det, drop)| if drop { None } else { Some(det) })
            .collect()
    }
}
