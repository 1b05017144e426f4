//! Per-frame traffic analytics pipeline.

use std::collections::HashSet;

use nalgebra::Point2;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::analytics::congestion::{CongestionDetector, CongestionSnapshot};
use crate::analytics::counters::Counters;
use crate::analytics::crossing::{CrossingEvent, LineCrossingCounter};
use crate::analytics::detection::{ClassLabel, Detection, TrackId};
use crate::analytics::merge::MergeFilter;
use crate::analytics::rect::Rect;
use crate::analytics::smoother::ClassSmoother;
use crate::analytics::track_state::{Color, TrackStore};
use crate::error::ConfigError;

/// Configuration for the TrafficAnalyzer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Detections at or below this confidence are dropped
    pub confidence_threshold: f32,
    /// Classes admitted for analysis; empty admits everything
    pub target_classes: Vec<ClassLabel>,
    /// Class suppressed when riding a carrier, also excluded from vehicle totals
    pub rider_class: ClassLabel,
    pub carrier_class: ClassLabel,
    pub merge_iou_threshold: f32,
    /// Y coordinate of the horizontal counting line
    pub line_y: f32,
    pub trajectory_len: usize,
    pub class_window: usize,
    pub congestion_distance: f32,
    pub congestion_neighbors: usize,
    pub congestion_alert: usize,
    /// Seed for display colors
    pub color_seed: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.4,
            target_classes: ["person", "car", "motorcycle", "bus", "truck"]
                .into_iter()
                .map(ClassLabel::from)
                .collect(),
            rider_class: "person".into(),
            carrier_class: "motorcycle".into(),
            merge_iou_threshold: 0.3,
            line_y: 500.0,
            trajectory_len: 30,
            class_window: 20,
            congestion_distance: 70.0,
            congestion_neighbors: 4,
            congestion_alert: 8,
            color_seed: 0,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::ConfidenceThreshold(self.confidence_threshold));
        }
        if !(0.0..=1.0).contains(&self.merge_iou_threshold) {
            return Err(ConfigError::MergeIouThreshold(self.merge_iou_threshold));
        }
        if !self.line_y.is_finite() {
            return Err(ConfigError::LineY(self.line_y));
        }
        if self.trajectory_len < 2 {
            return Err(ConfigError::TrajectoryLen(self.trajectory_len));
        }
        if self.class_window == 0 {
            return Err(ConfigError::ClassWindow);
        }
        if !(self.congestion_distance.is_finite() && self.congestion_distance > 0.0) {
            return Err(ConfigError::CongestionDistance(self.congestion_distance));
        }
        if self.rider_class == self.carrier_class {
            return Err(ConfigError::MergeClasses(self.rider_class.to_string()));
        }
        Ok(())
    }

    fn admits(&self, det: &Detection) -> bool {
        det.confidence > self.confidence_threshold
            && (self.target_classes.is_empty() || self.target_classes.contains(&det.class))
    }
}

/// An object that survived filtering in the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedObject {
    pub track_id: TrackId,
    /// Smoothed class
    pub class: ClassLabel,
    pub bbox: Rect,
    pub confidence: f32,
    pub anchor: Point2<f32>,
    pub color: Color,
    pub congested: bool,
}

/// Everything produced by one frame, for rendering and logging.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameReport {
    pub frame_index: u64,
    pub objects: Vec<TrackedObject>,
    pub events: Vec<CrossingEvent>,
    pub congestion: CongestionSnapshot,
}

/// Stateful analytics for one video stream.
///
/// Frames must be fed in order; each call to [`process_frame`](Self::process_frame)
/// completes every update before returning.
pub struct TrafficAnalyzer {
    config: AnalyzerConfig,
    frame_index: u64,
    store: TrackStore,
    smoother: ClassSmoother,
    merge: MergeFilter,
    crossing: LineCrossingCounter,
    congestion: CongestionDetector,
    counters: Counters,
    alert_active: bool,
}

impl TrafficAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            frame_index: 0,
            store: TrackStore::new(config.class_window, config.trajectory_len, config.color_seed),
            smoother: ClassSmoother::new(),
            merge: MergeFilter::new(
                config.rider_class.clone(),
                config.carrier_class.clone(),
                config.merge_iou_threshold,
            ),
            crossing: LineCrossingCounter::new(config.line_y),
            congestion: CongestionDetector::new(
                config.congestion_distance,
                config.congestion_neighbors,
                config.congestion_alert,
            ),
            counters: Counters::new(),
            alert_active: false,
            config,
        })
    }

    pub fn process_frame(&mut self, detections: Vec<Detection>) -> FrameReport {
        self.frame_index += 1;
        let frame_index = self.frame_index;

        let mut detections: Vec<Detection> = detections
            .into_iter()
            .filter(|det| self.config.admits(det))
            .collect();

        // Smoothing runs before merging so suppression sees stable classes
        self.smoother.apply(&mut self.store, &mut detections);
        let detections = self.merge.apply(detections);

        for det in &detections {
            self.store.update(det.track_id, det.bbox.anchor());
        }

        let current_ids: HashSet<TrackId> = detections.iter().map(|d| d.track_id).collect();
        let evicted = self.store.evict_absent(&current_ids);

        let vehicles: Vec<(TrackId, Point2<f32>)> = detections
            .iter()
            .filter(|det| !self.is_rider(&det.class))
            .filter_map(|det| Some((det.track_id, self.store.get_last_position(det.track_id)?)))
            .collect();
        let congestion = self.congestion.detect(&vehicles);

        if congestion.alert && !self.alert_active {
            warn!(
                frame = frame_index,
                congested = congestion.congested.len(),
                "traffic congestion alert"
            );
        }
        self.alert_active = congestion.alert;

        let mut events = Vec::new();
        for det in &detections {
            let last_pair = self
                .store
                .get(det.track_id)
                .and_then(|track| track.trajectory.last_pair());

            let event = self
                .crossing
                .check(frame_index, det.track_id, &det.class, last_pair);
            if let Some(event) = event {
                let is_vehicle = !self.is_rider(&event.class);
                self.counters.record(&event, is_vehicle);
                events.push(event);
            }
        }

        let objects = detections
            .into_iter()
            .filter_map(|det| {
                let track = self.store.get(det.track_id)?;
                Some(TrackedObject {
                    anchor: track.last_position()?,
                    color: track.color,
                    congested: congestion.is_congested(det.track_id),
                    track_id: det.track_id,
                    class: det.class,
                    bbox: det.bbox,
                    confidence: det.confidence,
                })
            })
            .collect::<Vec<_>>();

        debug!(
            frame = frame_index,
            objects = objects.len(),
            evicted,
            events = events.len(),
            "frame processed"
        );

        FrameReport {
            frame_index,
            objects,
            events,
            congestion,
        }
    }

    #[inline]
    fn is_rider(&self, class: &ClassLabel) -> bool {
        *class == self.config.rider_class
    }

    #[inline]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Number of frames processed so far.
    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    #[inline]
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    #[inline]
    pub fn store(&self) -> &TrackStore {
        &self.store
    }

    #[inline]
    pub fn crossing(&self) -> &LineCrossingCounter {
        &self.crossing
    }

    pub fn into_counters(self) -> Counters {
        self.counters
    }
}
