mod common;
use common::write_signal_chunk;
use megprep::{prepare_participant, DownsampleMethod, PrepConfig, Scaling};

const PID: &str = "100307";

#[test]
fn default_config_is_plain_load() {
    let dir = tempfile::tempdir().unwrap();
    let written = write_signal_chunk(dir.path(), "rest", PID, 0, 4, 60);

    let arrays = prepare_participant(dir.path(), PID, &PrepConfig::default()).unwrap();
    assert_eq!(arrays.rest.unwrap(), written);
}

#[test]
fn downsample_then_scale() {
    let dir = tempfile::tempdir().unwrap();
    write_signal_chunk(dir.path(), "rest", PID, 0, 4, 500);
    write_signal_chunk(dir.path(), "rest", PID, 1, 4, 500);

    let cfg = PrepConfig {
        scaling: Some(Scaling::MinMax),
        factor: Some(2),
        ..PrepConfig::default()
    };
    let arrays = prepare_participant(dir.path(), PID, &cfg).unwrap();
    let rest = arrays.rest.unwrap();

    // 1000 joined samples strided by 2, then scaled into [0, 1] per row.
    assert_eq!(rest.dim(), (4, 500));
    for row in rest.rows() {
        let lo = row.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!((0.0..=1.0).contains(&lo) && (0.0..=1.0).contains(&hi));
    }
}

#[test]
fn zscore_via_target_rate() {
    let dir = tempfile::tempdir().unwrap();
    write_signal_chunk(dir.path(), "task_motor", PID, 0, 3, 1200);

    let cfg = PrepConfig {
        scaling: Some(Scaling::Zscore),
        target_rate: Some(250.0),
        orig_rate: 1000.0,
        method: DownsampleMethod::Decimate,
        ..PrepConfig::default()
    };
    let arrays = prepare_participant(dir.path(), PID, &cfg).unwrap();
    let motor = arrays.task_motor.unwrap();

    assert_eq!(motor.dim(), (3, 300));
    for row in motor.rows() {
        let n = row.len() as f64;
        let mean = row.sum() / n;
        let var = row.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
        approx::assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-10);
        approx::assert_abs_diff_eq!(var, 1.0, epsilon = 1e-4);
    }
}

#[test]
fn absent_tasks_stay_absent() {
    let dir = tempfile::tempdir().unwrap();
    write_signal_chunk(dir.path(), "task_story_math", PID, 0, 2, 100);

    let cfg = PrepConfig { scaling: Some(Scaling::Zscore), ..PrepConfig::default() };
    let arrays = prepare_participant(dir.path(), PID, &cfg).unwrap();

    assert!(arrays.rest.is_none());
    assert!(arrays.task_motor.is_none());
    assert!(arrays.task_story_math.is_some());
    assert!(arrays.task_working_memory.is_none());
}
