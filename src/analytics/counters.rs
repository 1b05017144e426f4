use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::info;

use crate::analytics::crossing::{CrossingEvent, Direction};
use crate::analytics::detection::ClassLabel;

/// Cumulative crossing tallies for a run. Only ever increases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    entering: BTreeMap<ClassLabel, u64>,
    exiting: BTreeMap<ClassLabel, u64>,
    vehicles_entering: u64,
    vehicles_exiting: u64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one crossing. `is_vehicle` also bumps the vehicle total for that direction.
    pub fn record(&mut self, event: &CrossingEvent, is_vehicle: bool) {
        let (by_class, vehicles) = match event.direction {
            Direction::Entering => (&mut self.entering, &mut self.vehicles_entering),
            Direction::Exiting => (&mut self.exiting, &mut self.vehicles_exiting),
        };

        *by_class.entry(event.class.clone()).or_insert(0) += 1;
        if is_vehicle {
            *vehicles += 1;
        }

        info!(
            track_id = event.track_id,
            class = %event.class,
            direction = event.direction.as_str(),
            frame = event.frame_index,
            "line crossing counted"
        );
    }

    #[inline]
    pub fn entering(&self) -> &BTreeMap<ClassLabel, u64> {
        &self.entering
    }

    #[inline]
    pub fn exiting(&self) -> &BTreeMap<ClassLabel, u64> {
        &self.exiting
    }

    pub fn count(&self, direction: Direction, class: &ClassLabel) -> u64 {
        let by_class = match direction {
            Direction::Entering => &self.entering,
            Direction::Exiting => &self.exiting,
        };
        by_class.get(class).copied().unwrap_or(0)
    }

    #[inline]
    pub fn total_vehicles_entering(&self) -> u64 {
        self.vehicles_entering
    }

    #[inline]
    pub fn total_vehicles_exiting(&self) -> u64 {
        self.vehicles_exiting
    }

    /// Sum over every class, riders included.
    pub fn total(&self, direction: Direction) -> u64 {
        match direction {
            Direction::Entering => self.entering.values().sum(),
            Direction::Exiting => self.exiting.values().sum(),
        }
    }

    /// Sorted union of classes seen in either direction.
    pub fn classes(&self) -> BTreeSet<&ClassLabel> {
        self.entering.keys().chain(self.exiting.keys()).collect()
    }
}
