//! Exactly-once line-crossing detection.

use std::collections::HashMap;

use nalgebra::Point2;
use serde::Serialize;

use crate::analytics::detection::{ClassLabel, TrackId};

/// Direction of a crossing relative to the image y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Anchor moved downward across the line
    Entering,
    /// Anchor moved upward across the line
    Exiting,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Entering => "entering",
            Direction::Exiting => "exiting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossingEvent {
    pub frame_index: u64,
    pub track_id: TrackId,
    pub class: ClassLabel,
    pub direction: Direction,
}

/// One-shot flags per track id. Never cleared during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountedFlags {
    pub entered: bool,
    pub exited: bool,
}

/// Watches anchor transitions across the horizontal line `y = line_y`.
///
/// Flags are keyed by track id and outlive the track state itself, so a
/// long-running stream grows this map by one entry per crossing id.
#[derive(Debug, Clone)]
pub struct LineCrossingCounter {
    line_y: f32,
    flags: HashMap<TrackId, CountedFlags>,
}

impl LineCrossingCounter {
    pub fn new(line_y: f32) -> Self {
        Self {
            line_y,
            flags: HashMap::new(),
        }
    }

    #[inline]
    pub fn line_y(&self) -> f32 {
        self.line_y
    }

    /// Direction of the transition `prev -> curr`, if it crosses the line.
    pub fn crossing(&self, prev_y: f32, curr_y: f32) -> Option<Direction> {
        let line = self.line_y;
        if prev_y <= line && line < curr_y {
            Some(Direction::Entering)
        } else if prev_y >= line && line > curr_y {
            Some(Direction::Exiting)
        } else {
            None
        }
    }

    /// Inspect the newest step of a trajectory and emit an event if it crosses
    /// the line in a direction not yet counted for `track_id`.
    pub fn check(
        &mut self,
        frame_index: u64,
        track_id: TrackId,
        class: &ClassLabel,
        last_pair: Option<(&Point2<f32>, &Point2<f32>)>,
    ) -> Option<CrossingEvent> {
        let (prev, curr) = last_pair?;
        let direction = self.crossing(prev.y, curr.y)?;

        let flags = self.flags.entry(track_id).or_default();
        let flag = match direction {
            Direction::Entering => &mut flags.entered,
            Direction::Exiting => &mut flags.exited,
        };
        if *flag {
            return None;
        }
        *flag = true;

        Some(CrossingEvent {
            frame_index,
            track_id,
            class: class.clone(),
            direction,
        })
    }

    /// Flags recorded for `track_id`, all unset for unknown ids.
    pub fn flags(&self, track_id: TrackId) -> CountedFlags {
        self.flags.get(&track_id).copied().unwrap_or_default()
    }
}
