//! Majority-vote class smoothing over a track's recent labels.

use crate::analytics::detection::{ClassLabel, Detection};
use crate::analytics::track_state::TrackStore;

/// Most frequent label in `history`, scanned oldest to newest.
///
/// On a tie the label that reached the winning count first wins, so the
/// result only depends on the order of observations.
pub fn majority_label<'a, I>(history: I) -> Option<ClassLabel>
where
    I: IntoIterator<Item = &'a ClassLabel>,
{
    // insertion-ordered counts; windows are small
    let mut counts: Vec<(&ClassLabel, usize)> = Vec::new();
    let mut best: Option<(&ClassLabel, usize)> = None;

    for label in history {
        let count = match counts.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, count)) => {
                *count += 1;
                *count
            }
            None => {
                counts.push((label, 1));
                1
            }
        };

        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((label, count));
        }
    }

    best.map(|(label, _)| label.clone())
}

/// Replaces each detection's raw label with its track's smoothed label.
///
/// Must run before the merge filter so suppression sees stable classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassSmoother;

impl ClassSmoother {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, store: &mut TrackStore, detections: &mut [Detection]) {
        for det in detections.iter_mut() {
            let history = store.push_label(det.track_id, det.class.clone());
            if let Some(label) = majority_label(history.iter()) {
                det.class = label;
            }
        }
    }
}
