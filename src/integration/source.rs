//! Trait for upstream detection/tracking backends.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::analytics::Detection;
use crate::error::SourceError;

/// Per-frame supplier of tracked detections.
///
/// Implement this trait to connect any detector/tracker to the analyzer.
///
/// # Example
///
/// ```
/// use traffic_analytics::{Detection, FrameSource};
///
/// struct Replay {
///     frames: std::vec::IntoIter<Vec<Detection>>,
/// }
///
/// impl FrameSource for Replay {
///     type Error = std::io::Error;
///
///     fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, Self::Error> {
///         Ok(self.frames.next())
///     }
/// }
/// ```
pub trait FrameSource {
    /// Error type for upstream failures.
    type Error;

    /// Detections of the next frame, `Ok(None)` once the stream has ended.
    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, Self::Error>;
}

/// Reads frames from JSON Lines, one JSON array of detections per line.
///
/// A blank line is a frame without detections.
pub struct JsonLinesSource<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl JsonLinesSource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> FrameSource for JsonLinesSource<R> {
    type Error = SourceError;

    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, Self::Error> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;

        let record = self.buf.trim();
        if record.is_empty() {
            return Ok(Some(Vec::new()));
        }

        serde_json::from_str(record)
            .map(Some)
            .map_err(|source| SourceError::Parse {
                line: self.line,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_frames_in_order() {
        let input = concat!(
            r#"[{"bbox": [0, 0, 10, 10], "class": "car", "confidence": 0.9, "track_id": 1}]"#,
            "\n\n",
            r#"[{"bbox": [0, 5, 10, 15], "class": "car", "confidence": 0.8, "track_id": 1},"#,
            r#" {"bbox": [50, 50, 60, 60], "class": "bus", "confidence": 0.7, "track_id": 2}]"#,
            "\n",
        );
        let mut source = JsonLinesSource::new(Cursor::new(input));

        assert_eq!(source.next_frame().unwrap().unwrap().len(), 1);
        assert!(source.next_frame().unwrap().unwrap().is_empty());
        assert_eq!(source.next_frame().unwrap().unwrap().len(), 2);
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let input = "[]\n[{\"bbox\": [0, 0]}]\n";
        let mut source = JsonLinesSource::new(Cursor::new(input));

        assert!(source.next_frame().unwrap().unwrap().is_empty());
        match source.next_frame() {
            Err(SourceError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
