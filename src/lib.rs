//! Traffic analytics on top of an external detector/tracker.
//!
//! Turns per-frame tracked detections into stable, deduplicated analytics:
//! directional line-crossing counts per class and per-frame congestion alerts.
//! The [`analytics`] tree holds the synchronous core, [`integration`] the seams
//! for frame sources, the pipeline driver and the CSV report.

pub mod analytics;
pub mod error;
pub mod integration;

pub use analytics::{
    AnalyzerConfig, ClassLabel, Color, CongestionSnapshot, Counters, CrossingEvent, Detection,
    Direction, FrameReport, Rect, TrackId, TrackedObject, TrafficAnalyzer,
};
pub use error::{ConfigError, PipelineError, ReportError, SourceError};
pub use integration::{
    AnalyticsPipeline, DetectionBuilder, FrameSource, JsonLinesSource, RunSummary,
    default_report_path, write_report, write_report_file,
};
