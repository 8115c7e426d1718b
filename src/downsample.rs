//! Integer-factor temporal downsampling.
//!
//! Two methods:
//!   `Stride`   — keep every q-th sample (fast, aliasing-prone).
//!   `Decimate` — zero-phase Butterworth lowpass at 0.8× the post-decimation
//!                Nyquist, then stride.
//!
//! The factor comes either directly from [`DownsampleOptions::factor`] or
//! from `round(orig_rate / target_rate)`.
use anyhow::{bail, Result};
use ndarray::{s, Array2};
use sci_rs::signal::filter::{design::*, sosfiltfilt_dyn};
use std::str::FromStr;

/// Subsampling strategy along the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownsampleMethod {
    #[default]
    Stride,
    Decimate,
}

impl FromStr for DownsampleMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stride" => Ok(DownsampleMethod::Stride),
            "decimate" => Ok(DownsampleMethod::Decimate),
            other => bail!("unknown downsample method '{other}' (expected 'stride' or 'decimate')"),
        }
    }
}

/// How to pick the decimation factor.
///
/// Exactly one of `factor` or `target_rate` must be set; the rate path also
/// needs `orig_rate`.
#[derive(Debug, Clone, Default)]
pub struct DownsampleOptions {
    pub factor: Option<usize>,
    pub orig_rate: Option<f64>,
    pub target_rate: Option<f64>,
    pub method: DownsampleMethod,
}

impl DownsampleOptions {
    /// Resolve the integer decimation factor.
    pub fn resolve_factor(&self) -> Result<usize> {
        if let Some(f) = self.factor {
            return Ok(f);
        }
        let Some(target) = self.target_rate else {
            bail!("downsample needs either a factor or a target rate");
        };
        let Some(orig) = self.orig_rate else {
            bail!("downsampling to a target rate needs the original rate");
        };
        if orig <= 0.0 || target <= 0.0 {
            bail!("sampling rates must be positive (orig {orig}, target {target})");
        }
        Ok(decimation_factor(orig, target))
    }
}

/// `round(orig_rate / target_rate)` as an integer factor.
pub fn decimation_factor(orig_rate: f64, target_rate: f64) -> usize {
    (orig_rate / target_rate).round() as usize
}

/// Downsample along the time axis. A resolved factor ≤ 1 returns a copy of
/// the input unchanged.
pub fn downsample(data: &Array2<f64>, opts: &DownsampleOptions) -> Result<Array2<f64>> {
    let factor = opts.resolve_factor()?;
    if factor <= 1 {
        return Ok(data.clone());
    }
    let out = match opts.method {
        DownsampleMethod::Stride => stride(data, factor),
        DownsampleMethod::Decimate => decimate(data, factor),
    };
    Ok(out)
}

/// Keep every `factor`-th sample along the time axis.
pub fn stride(data: &Array2<f64>, factor: usize) -> Array2<f64> {
    data.slice(s![.., ..;factor]).to_owned()
}

/// Anti-aliased decimation: lowpass each row forward-backward, then stride.
pub fn decimate(data: &Array2<f64>, factor: usize) -> Array2<f64> {
    let sos = design_antialias(factor);
    let mut filtered = Array2::<f64>::zeros(data.dim());
    for (ch, row) in data.rows().into_iter().enumerate() {
        let y: Vec<f64> = sosfiltfilt_dyn(row.iter().copied(), &sos);
        filtered
            .row_mut(ch)
            .assign(&ndarray::ArrayView1::from(&y[..]));
    }
    stride(&filtered, factor)
}

/// 8th-order Butterworth lowpass at `0.8 / factor` of Nyquist
/// (fs normalised to 2 Hz so the cutoff is a Nyquist fraction).
fn design_antialias(factor: usize) -> Vec<Sos<f64>> {
    let filter = butter_dyn(
        8,
        vec![0.8 / factor as f64],
        Some(FilterBandType::Lowpass),
        Some(false),
        Some(FilterOutputType::Sos),
        Some(2.0),
    );
    let DigitalFilter::Sos(SosFormatFilter { sos }) = filter else {
        panic!("failed to design anti-aliasing filter");
    };
    sos
}
