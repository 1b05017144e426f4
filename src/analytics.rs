mod congestion;
mod counters;
mod crossing;
mod detection;
mod history;
mod merge;
mod rect;
mod smoother;
mod track_state;
mod traffic_analyzer;

pub use congestion::{CongestionDetector, CongestionSnapshot, distance_matrix};
pub use counters::Counters;
pub use crossing::{CountedFlags, CrossingEvent, Direction, LineCrossingCounter};
pub use detection::{ClassLabel, Detection, TrackId};
pub use history::BoundedHistory;
pub use merge::MergeFilter;
pub use rect::{Rect, contained_ratio_ioa, iou_batch, overlap_ratio_iou};
pub use smoother::{ClassSmoother, majority_label};
pub use track_state::{Color, Track, TrackStore};
pub use traffic_analyzer::{AnalyzerConfig, FrameReport, TrackedObject, TrafficAnalyzer};
