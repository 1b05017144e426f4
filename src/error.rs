use thiserror::Error;

/// Rejected analyzer configuration. Raised before any frame is processed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("confidence threshold must lie in [0, 1], got {0}")]
    ConfidenceThreshold(f32),

    #[error("merge IoU threshold must lie in [0, 1], got {0}")]
    MergeIouThreshold(f32),

    #[error("counting line must be finite, got {0}")]
    LineY(f32),

    #[error("trajectory length must be at least 2, got {0}")]
    TrajectoryLen(usize),

    #[error("class smoothing window must be at least 1")]
    ClassWindow,

    #[error("congestion distance must be positive and finite, got {0}")]
    CongestionDistance(f32),

    #[error("rider and carrier classes must differ, both are {0:?}")]
    MergeClasses(String),
}

/// Failure of a frame source to produce the next frame.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error reading detections: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed frame record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Error raised while driving a pipeline.
///
/// Upstream failures end the run; counters accumulated so far stay valid.
#[derive(Debug, Error)]
pub enum PipelineError<E: std::error::Error + 'static> {
    #[error("detection source unavailable at frame {frame}: {source}")]
    Upstream {
        frame: u64,
        #[source]
        source: E,
    },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
