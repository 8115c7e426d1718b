//! Stateless scaling transforms.
//!
//! `minmax_scale` — `(x - min) / (max - min + EPS)`, lane-wise along an axis.
//! `zscore`       — `(x - mean) / (std + EPS)`, population std (ddof = 0).
//!
//! Both return new arrays and never mutate their input. Reducing along
//! `Axis(1)` gives per-row (per-node) statistics, the common case for
//! `[nodes, timepoints]` recordings.
use ndarray::{Array2, Axis};

/// Division guard for constant lanes.
pub const EPS: f64 = 1e-8;

/// Rescale each lane to `[0, 1]`.
///
/// Statistics are reduced along `axis`; constant lanes come out ~0 instead
/// of dividing by zero.
pub fn minmax_scale(data: &Array2<f64>, axis: Axis) -> Array2<f64> {
    if data.is_empty() {
        return data.clone();
    }
    let min = data
        .fold_axis(axis, f64::INFINITY, |&a, &b| a.min(b))
        .insert_axis(axis);
    let max = data
        .fold_axis(axis, f64::NEG_INFINITY, |&a, &b| a.max(b))
        .insert_axis(axis);
    let span = &max - &min + EPS;
    (data - &min) / &span
}

/// Standardize each lane to ~zero mean and ~unit variance.
pub fn zscore(data: &Array2<f64>, axis: Axis) -> Array2<f64> {
    if data.is_empty() {
        return data.clone();
    }
    let mean = data.mean_axis(axis).unwrap().insert_axis(axis);
    let std = data.std_axis(axis, 0.0).insert_axis(axis);
    (data - &mean) / &(std + EPS)
}
