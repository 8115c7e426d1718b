//! # megprep — chunked MEG task-recording preparation
//!
//! `megprep` loads HCP-style MEG sensor arrays stored one time-segment per
//! file and applies optional amplitude scaling and temporal downsampling.
//! Everything is a stateless function over in-memory [`ndarray`] arrays.
//!
//! ## Data layout
//!
//! ```text
//! data/
//!   rest_105923_0.safetensors                [nodes, T0]  key: rest_105923
//!   rest_105923_1.safetensors                [nodes, T1]  key: rest_105923
//!   task_motor_105923_0.safetensors          [nodes, T2]  key: task_motor_105923
//!   task_working_memory_105923_0.safetensors [nodes, T3]  key: task_working_memory_105923
//!   ...
//! ```
//!
//! A participant's chunks are bucketed by task prefix (`rest`, `task_motor`,
//! `task_story_math`, `task_working_memory`), ordered by the chunk index in
//! the filename and joined along the time axis. The node axis must agree
//! across chunks of a task; nothing else is validated.
//!
//! ## Quick start
//!
//! ```no_run
//! use megprep::{load_participant_arrays, minmax_scale, downsample, DownsampleOptions};
//! use ndarray::Axis;
//! use std::path::Path;
//!
//! let arrays = load_participant_arrays(Path::new("data"), "105923").unwrap();
//!
//! if let Some(rest) = &arrays.rest {
//!     // Per-node rescale to [0, 1].
//!     let scaled = minmax_scale(rest, Axis(1));
//!
//!     // 508.63 Hz → ~250 Hz.
//!     let opts = DownsampleOptions {
//!         orig_rate: Some(508.63),
//!         target_rate: Some(250.0),
//!         ..Default::default()
//!     };
//!     let reduced = downsample(&scaled, &opts).unwrap();
//!     println!("rest: [{} x {}]", reduced.nrows(), reduced.ncols());
//! }
//! ```
//!
//! The transforms are independent of the loader: each takes an array (never
//! mutated) and returns a new one. [`prepare_participant`] chains
//! load → downsample → scale for callers that want the one-call version.

pub mod config;
pub mod downsample;
pub mod io;
pub mod loader;
pub mod normalize;

use anyhow::Result;
use ndarray::Axis;
use std::path::Path;

// ── Crate-root re-exports ─────────────────────────────────────────────────
//
// Everything a downstream user is likely to need is available directly as
// `megprep::Foo` without having to know the internal module layout.

// config
pub use config::{PrepConfig, Scaling, HCP_MEG_RATE};

// downsample
pub use downsample::{
    decimate, decimation_factor, downsample, stride, DownsampleMethod, DownsampleOptions,
};

// io — safetensors chunk files
pub use io::{read_named_array, write_chunk, ChunkWriter};

// loader
pub use loader::{load_participant_arrays, ParticipantArrays, Task, CHUNK_EXT};

// normalize
pub use normalize::{minmax_scale, zscore, EPS};

/// Load a participant and apply the transforms configured in `cfg`.
///
/// For each task with at least one chunk on disk: downsample (when
/// [`PrepConfig::factor`] or [`PrepConfig::target_rate`] is set), then scale
/// (when [`PrepConfig::scaling`] is set) with per-row statistics. With the
/// default config this is exactly [`load_participant_arrays`].
///
/// # Errors
///
/// Propagates loader failures (unreadable chunks, row-count mismatch) and
/// downsampler misconfiguration.
pub fn prepare_participant(
    dir: &Path,
    participant: &str,
    cfg: &PrepConfig,
) -> Result<ParticipantArrays> {
    let mut arrays = load_participant_arrays(dir, participant)?;
    let opts = cfg.downsample_options();

    for task in Task::ALL {
        let Some(mut data) = arrays.take(task) else {
            continue;
        };
        if cfg.wants_downsample() {
            data = downsample::downsample(&data, &opts)?;
        }
        data = match cfg.scaling {
            Some(Scaling::MinMax) => normalize::minmax_scale(&data, Axis(1)),
            Some(Scaling::Zscore) => normalize::zscore(&data, Axis(1)),
            None => data,
        };
        arrays.set(task, data);
    }
    Ok(arrays)
}
