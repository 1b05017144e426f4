use std::io::Cursor;
use std::ops::ControlFlow;

use traffic_analytics::{
    AnalyticsPipeline, AnalyzerConfig, Detection, DetectionBuilder, Direction, FrameSource,
    JsonLinesSource, PipelineError, TrafficAnalyzer, write_report,
};

fn car(track_id: u64, y2: i32) -> Detection {
    DetectionBuilder::new()
        .tlbr(100, y2 - 40, 160, y2)
        .class("car")
        .confidence(0.9)
        .track_id(track_id)
        .build()
}

fn line_at(line_y: f32) -> AnalyzerConfig {
    AnalyzerConfig {
        line_y,
        ..Default::default()
    }
}

#[test]
fn test_single_car_crossing() {
    let mut analyzer = TrafficAnalyzer::new(line_at(100.0)).unwrap();

    for y in [90, 95, 100, 105, 110] {
        analyzer.process_frame(vec![car(1, y)]);
    }

    let counters = analyzer.counters();
    assert_eq!(counters.entering().len(), 1);
    assert_eq!(counters.count(Direction::Entering, &"car".into()), 1);
    assert!(counters.exiting().is_empty());
    assert_eq!(counters.total_vehicles_entering(), 1);
    assert_eq!(counters.total_vehicles_exiting(), 0);
}

#[test]
fn test_round_trip_counted_each_way() {
    let mut analyzer = TrafficAnalyzer::new(line_at(100.0)).unwrap();

    for y in [80, 120, 130, 90, 120, 80] {
        analyzer.process_frame(vec![car(5, y)]);
    }

    let counters = analyzer.counters();
    assert_eq!(counters.total_vehicles_entering(), 1);
    assert_eq!(counters.total_vehicles_exiting(), 1);
}

#[test]
fn test_flickering_class_counted_under_majority() {
    let mut analyzer = TrafficAnalyzer::new(line_at(100.0)).unwrap();
    let frames = [(70, "truck"), (80, "truck"), (90, "car"), (110, "truck")];

    for (y, class) in frames {
        let det = DetectionBuilder::new()
            .tlbr(0, y - 50, 80, y)
            .class(class)
            .confidence(0.8)
            .track_id(9)
            .build();
        analyzer.process_frame(vec![det]);
    }

    let counters = analyzer.counters();
    assert_eq!(counters.count(Direction::Entering, &"truck".into()), 1);
    assert_eq!(counters.count(Direction::Entering, &"car".into()), 0);
}

#[test]
fn test_independent_tracks() {
    let mut analyzer = TrafficAnalyzer::new(line_at(100.0)).unwrap();
    analyzer.process_frame(vec![car(1, 90), car(2, 150)]);
    analyzer.process_frame(vec![car(1, 110), car(2, 80)]);

    let counters = analyzer.counters();
    assert_eq!(counters.total_vehicles_entering(), 1);
    assert_eq!(counters.total_vehicles_exiting(), 1);
}

struct FailingSource {
    frames: Vec<Vec<Detection>>,
}

impl FrameSource for FailingSource {
    type Error = std::io::Error;

    fn next_frame(&mut self) -> Result<Option<Vec<Detection>>, Self::Error> {
        if self.frames.is_empty() {
            return Err(std::io::Error::other("camera disconnected"));
        }
        Ok(Some(self.frames.remove(0)))
    }
}

#[test]
fn test_upstream_failure_keeps_partial_counts() {
    let source = FailingSource {
        frames: vec![vec![car(1, 90)], vec![car(1, 110)]],
    };
    let mut pipeline = AnalyticsPipeline::new(source, line_at(100.0)).unwrap();

    let err = pipeline.run(|_| ControlFlow::Continue(())).unwrap_err();
    let PipelineError::Upstream { frame, .. } = err;
    assert_eq!(frame, 3);

    assert_eq!(pipeline.analyzer().frame_index(), 2);
    assert_eq!(pipeline.counters().total_vehicles_entering(), 1);
}

#[test]
fn test_jsonl_to_report() {
    let input = [
        r#"[{"bbox": [0, 60, 40, 90], "class": "car", "confidence": 0.9, "track_id": 1},"#,
        r#" {"bbox": [300, 80, 340, 130], "class": "bus", "confidence": 0.9, "track_id": 2}]"#,
        "\n",
        r#"[{"bbox": [0, 80, 40, 110], "class": "car", "confidence": 0.9, "track_id": 1},"#,
        r#" {"bbox": [300, 40, 340, 90], "class": "bus", "confidence": 0.9, "track_id": 2}]"#,
        "\n",
    ]
    .concat();

    let source = JsonLinesSource::new(Cursor::new(input));
    let mut pipeline = AnalyticsPipeline::new(source, line_at(100.0)).unwrap();
    let summary = pipeline.run(|_| ControlFlow::Continue(())).unwrap();
    assert_eq!(summary.frames, 2);

    let mut out = Vec::new();
    write_report(pipeline.counters(), &mut out).unwrap();
    let report = String::from_utf8(out).unwrap();

    assert!(report.contains("Total Vehicles Entering,1\n"));
    assert!(report.contains("Total Vehicles Exiting,1\n"));
    assert!(report.contains("Entering: bus,0\n"));
    assert!(report.contains("Entering: car,1\n"));
    assert!(report.contains("Exiting: bus,1\n"));
}
