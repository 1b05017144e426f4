//! AnalyticsPipeline for combining a frame source with the analyzer.

use std::ops::ControlFlow;

use tracing::{info, warn};

use crate::analytics::{AnalyzerConfig, Counters, FrameReport, TrafficAnalyzer};
use crate::error::{ConfigError, PipelineError};

use super::FrameSource;

const PROGRESS_INTERVAL: u64 = 100;

/// Outcome of [`AnalyticsPipeline::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames fully processed
    pub frames: u64,
    /// The callback asked to stop before the source ended
    pub stopped_early: bool,
}

/// Bundles a [`FrameSource`] with a [`TrafficAnalyzer`].
///
/// Frames are processed strictly one after another. Stopping, whether
/// requested or caused by a source failure, only ever happens between frames,
/// so the counters always describe every frame processed so far.
pub struct AnalyticsPipeline<S: FrameSource> {
    source: S,
    analyzer: TrafficAnalyzer,
}

impl<S> AnalyticsPipeline<S>
where
    S: FrameSource,
    S::Error: std::error::Error + 'static,
{
    /// Create a new pipeline with the given source and analyzer config.
    pub fn new(source: S, config: AnalyzerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            source,
            analyzer: TrafficAnalyzer::new(config)?,
        })
    }

    /// Pull and process a single frame. `Ok(None)` at end of stream.
    pub fn process_next(&mut self) -> Result<Option<FrameReport>, PipelineError<S::Error>> {
        let frame = self.analyzer.frame_index() + 1;
        let detections = match self.source.next_frame() {
            Ok(Some(detections)) => detections,
            Ok(None) => return Ok(None),
            Err(source) => {
                warn!(frame, "detection source failed, ending run");
                return Err(PipelineError::Upstream { frame, source });
            }
        };

        Ok(Some(self.analyzer.process_frame(detections)))
    }

    /// Process frames until the source ends or `on_frame` breaks.
    pub fn run<F>(&mut self, mut on_frame: F) -> Result<RunSummary, PipelineError<S::Error>>
    where
        F: FnMut(&FrameReport) -> ControlFlow<()>,
    {
        let start = self.analyzer.frame_index();
        let mut stopped_early = false;

        while let Some(report) = self.process_next()? {
            if report.frame_index % PROGRESS_INTERVAL == 0 {
                let counters = self.analyzer.counters();
                info!(
                    frame = report.frame_index,
                    entering = counters.total_vehicles_entering(),
                    exiting = counters.total_vehicles_exiting(),
                    "processing"
                );
            }

            if on_frame(&report).is_break() {
                stopped_early = true;
                break;
            }
        }

        let summary = RunSummary {
            frames: self.analyzer.frame_index() - start,
            stopped_early,
        };
        info!(frames = summary.frames, stopped_early, "run finished");
        Ok(summary)
    }

    /// Get a reference to the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a reference to the underlying analyzer.
    pub fn analyzer(&self) -> &TrafficAnalyzer {
        &self.analyzer
    }

    #[inline]
    pub fn counters(&self) -> &Counters {
        self.analyzer.counters()
    }

    pub fn into_analyzer(self) -> TrafficAnalyzer {
        self.analyzer
    }
}
