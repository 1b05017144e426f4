//! Per-track bounded state, keyed by upstream track id.

use std::collections::{HashMap, HashSet};

use nalgebra::Point2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::analytics::detection::{ClassLabel, TrackId};
use crate::analytics::history::BoundedHistory;

/// Display color of a track. Has no influence on analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// State held for one track id while the tracker reports it.
#[derive(Debug, Clone)]
pub struct Track {
    /// Recent raw class labels, oldest first
    pub labels: BoundedHistory<ClassLabel>,
    /// Recent anchor points, oldest first
    pub trajectory: BoundedHistory<Point2<f32>>,
    /// Assigned once when the track is created
    pub color: Color,
}

impl Track {
    fn new(class_window: usize, trajectory_len: usize, color: Color) -> Self {
        Self {
            labels: BoundedHistory::with_capacity(class_window),
            trajectory: BoundedHistory::with_capacity(trajectory_len),
            color,
        }
    }

    #[inline]
    pub fn last_position(&self) -> Option<Point2<f32>> {
        self.trajectory.newest().copied()
    }
}

/// Owns every live [`Track`]. At most one track exists per id.
#[derive(Debug)]
pub struct TrackStore {
    tracks: HashMap<TrackId, Track>,
    class_window: usize,
    trajectory_len: usize,
    rng: StdRng,
}

impl TrackStore {
    pub fn new(class_window: usize, trajectory_len: usize, color_seed: u64) -> Self {
        Self {
            tracks: HashMap::new(),
            class_window,
            trajectory_len,
            rng: StdRng::seed_from_u64(color_seed),
        }
    }

    fn entry(&mut self, track_id: TrackId) -> &mut Track {
        let Self {
            tracks,
            class_window,
            trajectory_len,
            rng,
        } = self;

        tracks.entry(track_id).or_insert_with(|| {
            let color = Color {
                r: rng.gen_range(0..=255),
                g: rng.gen_range(0..=255),
                b: rng.gen_range(0..=255),
            };
            Track::new(*class_window, *trajectory_len, color)
        })
    }

    /// Append a raw class observation, creating the track if needed.
    pub fn push_label(&mut self, track_id: TrackId, label: ClassLabel) -> &BoundedHistory<ClassLabel> {
        let track = self.entry(track_id);
        track.labels.push(label);
        &track.labels
    }

    /// Append an anchor point to the track's trajectory.
    pub fn update(&mut self, track_id: TrackId, anchor: Point2<f32>) {
        self.entry(track_id).trajectory.push(anchor);
    }

    /// Drop every track whose id is not in `current_ids`. Returns how many were removed.
    pub fn evict_absent(&mut self, current_ids: &HashSet<TrackId>) -> usize {
        let before = self.tracks.len();
        self.tracks.retain(|id, _| {
            let keep = current_ids.contains(id);
            if !keep {
                debug!(track_id = *id, "evicting absent track");
            }
            keep
        });
        before - self.tracks.len()
    }

    #[inline]
    pub fn get(&self, track_id: TrackId) -> Option<&Track> {
        self.tracks.get(&track_id)
    }

    #[inline]
    pub fn get_last_position(&self, track_id: TrackId) -> Option<Point2<f32>> {
        self.get(track_id).and_then(Track::last_position)
    }

    /// Anchor history of a track, empty for unknown ids.
    pub fn trajectory(&self, track_id: TrackId) -> impl Iterator<Item = &Point2<f32>> {
        self.get(track_id)
            .into_iter()
            .flat_map(|track| track.trajectory.iter())
    }

    #[inline]
    pub fn color(&self, track_id: TrackId) -> Option<Color> {
        self.get(track_id).map(|track| track.color)
    }

    #[inline]
    pub fn contains(&self, track_id: TrackId) -> bool {
        self.tracks.contains_key(&track_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trajectory_is_bounded() {
        let mut store = TrackStore::new(20, 30, 0);
        for y in 0..40 {
            store.update(1, Point2::new(0.0, y as f32));
        }

        let ys: Vec<f32> = store.trajectory(1).map(|p| p.y).collect();
        assert_eq!(ys.len(), 30);
        assert_eq!(ys[0], 10.0);
        assert_eq!(store.get_last_position(1), Some(Point2::new(0.0, 39.0)));
    }

    #[test]
    fn test_missing_track_has_no_data() {
        let store = TrackStore::new(20, 30, 0);
        assert!(store.get_last_position(42).is_none());
        assert_eq!(store.trajectory(42).count(), 0);
        assert!(store.color(42).is_none());
    }

    #[test]
    fn test_evict_absent() {
        let mut store = TrackStore::new(20, 30, 0);
        store.update(1, Point2::new(0.0, 0.0));
        store.update(2, Point2::new(5.0, 5.0));
        store.push_label(3, "car".into());

        let current: HashSet<TrackId> = [2].into_iter().collect();
        assert_eq!(store.evict_absent(&current), 2);
        assert!(!store.contains(1));
        assert!(store.contains(2));
        assert!(!store.contains(3));
    }

    #[test]
    fn test_reobserved_track_starts_fresh() {
        let mut store = TrackStore::new(20, 30, 7);
        store.push_label(1, "car".into());
        store.update(1, Point2::new(0.0, 0.0));
        store.update(1, Point2::new(0.0, 1.0));

        store.evict_absent(&HashSet::new());
        store.update(1, Point2::new(9.0, 9.0));

        let track = store.get(1).unwrap();
        assert_eq!(track.trajectory.len(), 1);
        assert!(track.labels.is_empty());
    }

    #[test]
    fn test_color_is_stable_and_seeded() {
        let mut a = TrackStore::new(20, 30, 11);
        let mut b = TrackStore::new(20, 30, 11);
        a.update(5, Point2::new(0.0, 0.0));
        b.update(5, Point2::new(0.0, 0.0));
        let color = a.color(5);
        assert_eq!(color, b.color(5));

        a.update(5, Point2::new(1.0, 1.0));
        assert_eq!(a.color(5), color);
    }
}
