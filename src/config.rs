//! Preparation configuration.
//!
//! [`PrepConfig`] holds the optional transform settings consumed by
//! [`prepare_participant`](crate::prepare_participant). The defaults load
//! arrays untouched.
use anyhow::bail;
use std::str::FromStr;

use crate::downsample::{DownsampleMethod, DownsampleOptions};

/// Sampling rate of HCP rmegpreproc chunk files (Hz).
pub const HCP_MEG_RATE: f64 = 508.63;

/// Which scaling transform to apply per node row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaling {
    MinMax,
    Zscore,
}

impl FromStr for Scaling {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "minmax" => Ok(Scaling::MinMax),
            "zscore" => Ok(Scaling::Zscore),
            other => bail!("unknown scaling '{other}' (expected 'minmax' or 'zscore')"),
        }
    }
}

/// Configuration for loading and transforming one participant.
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use megprep::{PrepConfig, Scaling};
///
/// let cfg = PrepConfig {
///     scaling: Some(Scaling::Zscore),
///     target_rate: Some(250.0),
///     ..PrepConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct PrepConfig {
    /// Scaling applied to each task array after any downsampling, with
    /// per-row (per-node) statistics.
    ///
    /// Default: `None` (leave amplitudes untouched).
    pub scaling: Option<Scaling>,

    /// Direct integer downsampling factor.
    ///
    /// Takes precedence over [`target_rate`](Self::target_rate) when both
    /// are set. A factor ≤ 1 leaves the time axis unchanged.
    ///
    /// Default: `None`.
    pub factor: Option<usize>,

    /// Target sampling rate in Hz; the factor becomes
    /// `round(orig_rate / target_rate)`.
    ///
    /// Default: `None` (no downsampling unless `factor` is set).
    pub target_rate: Option<f64>,

    /// Sampling rate of the chunk files in Hz.
    ///
    /// Only consumed by the `target_rate` path.
    ///
    /// Default: [`HCP_MEG_RATE`] (508.63 Hz).
    pub orig_rate: f64,

    /// Subsampling strategy.
    ///
    /// Default: [`DownsampleMethod::Stride`].
    pub method: DownsampleMethod,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            scaling: None,
            factor: None,
            target_rate: None,
            orig_rate: HCP_MEG_RATE,
            method: DownsampleMethod::Stride,
        }
    }
}

impl PrepConfig {
    /// Whether any downsampling is configured.
    pub fn wants_downsample(&self) -> bool {
        self.factor.is_some() || self.target_rate.is_some()
    }

    /// The downsampler options implied by this config.
    pub fn downsample_options(&self) -> DownsampleOptions {
        DownsampleOptions {
            factor: self.factor,
            orig_rate: Some(self.orig_rate),
            target_rate: self.target_rate,
            method: self.method,
        }
    }
}
