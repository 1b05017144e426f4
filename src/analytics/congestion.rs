//! Per-frame vehicle density heuristic.

use std::collections::BTreeSet;

use nalgebra::Point2;
use ndarray::Array2;
use serde::Serialize;

use crate::analytics::detection::TrackId;

/// Congestion state of a single frame. Recomputed every frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CongestionSnapshot {
    pub congested: BTreeSet<TrackId>,
    pub alert: bool,
}

impl CongestionSnapshot {
    #[inline]
    pub fn is_congested(&self, track_id: TrackId) -> bool {
        self.congested.contains(&track_id)
    }
}

/// Pairwise Euclidean distances between points.
pub fn distance_matrix(points: &[Point2<f32>]) -> Array2<f32> {
    let n = points.len();
    let mut dists = Array2::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            let d = nalgebra::distance(&points[i], &points[j]);
            dists[[i, j]] = d;
            dists[[j, i]] = d;
        }
    }
    dists
}

#[derive(Debug, Clone)]
pub struct CongestionDetector {
    /// Two vehicles closer than this are neighbors
    pub distance_threshold: f32,
    /// Minimum neighbors for a vehicle to be congested
    pub neighbor_threshold: usize,
    /// The alert fires when more than this many vehicles are congested
    pub alert_threshold: usize,
}

impl Default for CongestionDetector {
    fn default() -> Self {
        Self {
            distance_threshold: 70.0,
            neighbor_threshold: 4,
            alert_threshold: 8,
        }
    }
}

impl CongestionDetector {
    pub fn new(distance_threshold: f32, neighbor_threshold: usize, alert_threshold: usize) -> Self {
        Self {
            distance_threshold,
            neighbor_threshold,
            alert_threshold,
        }
    }

    /// Classify vehicles from their current positions.
    pub fn detect(&self, vehicles: &[(TrackId, Point2<f32>)]) -> CongestionSnapshot {
        let mut snapshot = CongestionSnapshot::default();
        if vehicles.len() < 2 {
            return snapshot;
        }

        let points: Vec<Point2<f32>> = vehicles.iter().map(|(_, p)| *p).collect();
        let dists = distance_matrix(&points);

        for (i, (track_id, _)) in vehicles.iter().enumerate() {
            let neighbors = dists
                .row(i)
                .iter()
                .enumerate()
                .filter(|&(j, &d)| j != i && d < self.distance_threshold)
                .count();

            if neighbors >= self.neighbor_threshold {
                snapshot.congested.insert(*track_id);
            }
        }

        snapshot.alert = snapshot.congested.len() > self.alert_threshold;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(count: u64) -> Vec<(TrackId, Point2<f32>)> {
        let offsets = [(0.0, 0.0), (20.0, 0.0), (0.0, 20.0), (-20.0, 0.0), (0.0, -20.0)];
        (0..count)
            .map(|i| {
                let (dx, dy) = offsets[i as usize];
                (i + 1, Point2::new(200.0 + dx, 200.0 + dy))
            })
            .collect()
    }

    #[test]
    fn test_five_clustered_are_congested() {
        let mut vehicles = cluster(5);
        vehicles.push((99, Point2::new(700.0, 200.0)));

        let snapshot = CongestionDetector::default().detect(&vehicles);
        assert_eq!(snapshot.congested, (1..=5).collect::<BTreeSet<_>>());
        assert!(!snapshot.is_congested(99));
        assert!(!snapshot.alert);
    }

    #[test]
    fn test_four_clustered_are_not() {
        let snapshot = CongestionDetector::default().detect(&cluster(4));
        assert!(snapshot.congested.is_empty());
    }

    #[test]
    fn test_alert_needs_more_than_threshold() {
        let grid: Vec<(TrackId, Point2<f32>)> = (0..9u64)
            .map(|i| (i, Point2::new((i % 3) as f32 * 10.0, (i / 3) as f32 * 10.0)))
            .collect();

        let detector = CongestionDetector::default();
        let snapshot = detector.detect(&grid);
        assert_eq!(snapshot.congested.len(), 9);
        assert!(snapshot.alert);

        let snapshot = detector.detect(&grid[..8]);
        assert_eq!(snapshot.congested.len(), 8);
        assert!(!snapshot.alert);
    }

    #[test]
    fn test_single_vehicle() {
        let detector = CongestionDetector::new(70.0, 0, 0);
        let snapshot = detector.detect(&[(1, Point2::new(0.0, 0.0))]);
        assert!(snapshot.congested.is_empty());
    }

    #[test]
    fn test_neighbor_distance_is_strict() {
        let detector = CongestionDetector::new(70.0, 1, 0);

        let at_threshold = [(1, Point2::new(0.0, 0.0)), (2, Point2::new(70.0, 0.0))];
        assert!(detector.detect(&at_threshold).congested.is_empty());

        let inside = [(1, Point2::new(0.0, 0.0)), (2, Point2::new(69.0, 0.0))];
        let snapshot = detector.detect(&inside);
        assert_eq!(snapshot.congested, BTreeSet::from([1, 2]));
        assert!(snapshot.alert);
    }

    #[test]
    fn test_distance_matrix_symmetric() {
        let points = [Point2::new(0.0, 0.0), Point2::new(3.0, 4.0)];
        let dists = distance_matrix(&points);
        assert_eq!(dists[[0, 1]], 5.0);
        assert_eq!(dists[[1, 0]], 5.0);
        assert_eq!(dists[[0, 0]], 0.0);
    }
}
