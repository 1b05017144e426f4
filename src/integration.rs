//! Integration module for connecting detection/tracking backends with the analyzer.
//!
//! This module provides the [`FrameSource`] seam for upstream detectors, a
//! pipeline driver that feeds frames to a [`TrafficAnalyzer`](crate::TrafficAnalyzer),
//! and the CSV report writer.

mod builder;
mod pipeline;
mod report;
mod source;

pub use builder::DetectionBuilder;
pub use pipeline::{AnalyticsPipeline, RunSummary};
pub use report::{default_report_path, write_report, write_report_file};
pub use source::{FrameSource, JsonLinesSource};
