use std::fs;
use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use traffic_analytics::{
    AnalyticsPipeline, AnalyzerConfig, JsonLinesSource, default_report_path, write_report_file,
};

/// Count line crossings and flag congestion from tracked detections.
#[derive(Parser, Debug)]
#[command(name = "traffic-analytics", version, about)]
struct Args {
    /// JSON Lines file, one array of tracked detections per frame
    #[arg(long, value_name = "PATH")]
    detections: PathBuf,
    /// Where to write the CSV report. Defaults to 'analysis_report_<name>.csv'
    #[arg(long, value_name = "PATH")]
    output_csv: Option<PathBuf>,
    /// JSON file overriding any analyzer settings
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long)]
    confidence_threshold: Option<f32>,
    /// IoU above which a person riding a motorcycle is merged into it
    #[arg(long)]
    merge_iou_threshold: Option<f32>,
    /// Y coordinate of the counting line
    #[arg(long)]
    line_y: Option<f32>,
    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,
}

fn load_config(args: &Args) -> Result<AnalyzerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => AnalyzerConfig::default(),
    };

    if let Some(v) = args.confidence_threshold {
        config.confidence_threshold = v;
    }
    if let Some(v) = args.merge_iou_threshold {
        config.merge_iou_threshold = v;
    }
    if let Some(v) = args.line_y {
        config.line_y = v;
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("traffic_analytics=info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let source = JsonLinesSource::open(&args.detections)
        .with_context(|| format!("opening {}", args.detections.display()))?;
    let mut pipeline = AnalyticsPipeline::new(source, config).context("invalid configuration")?;

    let max_frames = args.max_frames.unwrap_or(u64::MAX);
    let outcome = pipeline.run(|report| {
        if report.frame_index >= max_frames {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    // An upstream failure still leaves a valid report of the frames before it
    let upstream_failure = outcome.err();

    let counters = pipeline.counters();
    let output = args
        .output_csv
        .clone()
        .unwrap_or_else(|| default_report_path(&args.detections));
    write_report_file(counters, &output)
        .with_context(|| format!("writing report {}", output.display()))?;

    info!(
        vehicles_entering = counters.total_vehicles_entering(),
        vehicles_exiting = counters.total_vehicles_exiting(),
        report = %output.display(),
        "analysis complete"
    );
    for (class, count) in counters.entering() {
        println!("Entering {class}: {count}");
    }
    for (class, count) in counters.exiting() {
        println!("Exiting {class}: {count}");
    }
    println!("Entering vehicles: {}", counters.total_vehicles_entering());
    println!("Exiting vehicles: {}", counters.total_vehicles_exiting());

    match upstream_failure {
        Some(err) => Err(err).context("run ended early; report covers frames before the failure"),
        None => Ok(()),
    }
}
