//! End-to-end pipeline tests driven by a scripted frame source.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use upright::ingest::synthetic::{flat_frame, shoulder_frame};
use upright::{
    Monitor, MonitorParams, Reporter, ScriptedSource, BANNER, CORRECTION_MESSAGE, GOOD_MESSAGE,
};

fn run_pipeline(frames: Vec<upright::Frame>) -> (upright::RunSummary, Vec<String>) {
    let params = MonitorParams {
        interval: Duration::ZERO,
        ..MonitorParams::default()
    };
    let mut monitor = Monitor::new(
        ScriptedSource::new(frames),
        Reporter::new(Vec::new()),
        params,
    );
    let stop = AtomicBool::new(false);
    let summary = monitor.run(&stop).expect("pipeline run");
    let output = String::from_utf8(monitor.into_sink()).expect("utf8 output");
    (summary, output.lines().map(str::to_string).collect())
}

#[test]
fn horizontal_edge_reports_good_posture() {
    let (summary, lines) = run_pipeline(vec![shoulder_frame(320, 240, 0.0)]);

    assert_eq!(summary.frames, 1);
    assert_eq!(summary.good, 1);
    assert_eq!(lines, vec![BANNER.to_string(), GOOD_MESSAGE.to_string()]);
}

#[test]
fn featureless_frame_reports_correction_without_crashing() {
    let (summary, lines) = run_pipeline(vec![flat_frame(320, 240, 0)]);

    assert_eq!(summary.frames, 1);
    assert_eq!(summary.corrections, 1);
    assert_eq!(
        lines,
        vec![BANNER.to_string(), CORRECTION_MESSAGE.to_string()]
    );
}

#[test]
fn tilted_edge_reports_correction() {
    let (summary, lines) = run_pipeline(vec![shoulder_frame(320, 240, 25.0)]);

    assert_eq!(summary.corrections, 1);
    assert_eq!(lines[1], CORRECTION_MESSAGE);
}

#[test]
fn steep_diagonal_edge_reports_correction() {
    // 45 degrees sits on the NMS diagonal bins; the band must still reach the
    // line extractor and be judged tilted.
    let (summary, lines) = run_pipeline(vec![shoulder_frame(320, 240, 45.0)]);

    assert_eq!(summary.frames, 1);
    assert_eq!(summary.corrections, 1);
    assert_eq!(lines[1], CORRECTION_MESSAGE);
}

#[test]
fn mixed_sequence_is_judged_frame_by_frame() {
    let (summary, lines) = run_pipeline(vec![
        shoulder_frame(320, 240, 0.0),
        flat_frame(320, 240, 24),
        shoulder_frame(320, 240, 25.0),
        shoulder_frame(320, 240, 0.0),
    ]);

    assert_eq!(summary.frames, 4);
    assert_eq!(summary.good, 2);
    assert_eq!(summary.corrections, 2);
    assert_eq!(
        lines,
        vec![
            BANNER.to_string(),
            GOOD_MESSAGE.to_string(),
            CORRECTION_MESSAGE.to_string(),
            CORRECTION_MESSAGE.to_string(),
            GOOD_MESSAGE.to_string(),
        ]
    );
}

#[test]
fn end_of_stream_ends_the_run_normally() {
    let (summary, lines) = run_pipeline(Vec::new());

    assert_eq!(summary, upright::RunSummary::default());
    assert_eq!(lines, vec![BANNER.to_string()]);
}
