//! Participant chunk discovery, ordering and concatenation.
//!
//! Recordings are stored one time-segment per file as
//! `<task>_<participant>_<chunk>.safetensors`, e.g. `rest_105923_2` is the
//! third rest chunk of participant 105923. The tensor inside each file is
//! keyed by the stem minus the chunk suffix (`rest_105923`).
use anyhow::{bail, Context, Result};
use glob::glob;
use log::{debug, info};
use ndarray::{concatenate, Array2, Axis};
use std::path::{Path, PathBuf};

use crate::io::read_named_array;

/// Extension shared by every chunk file.
pub const CHUNK_EXT: &str = "safetensors";

/// The four experimental conditions recorded per participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Rest,
    Motor,
    StoryMath,
    WorkingMemory,
}

impl Task {
    /// Fixed matching order; the first prefix hit wins.
    pub const ALL: [Task; 4] = [
        Task::Rest,
        Task::Motor,
        Task::StoryMath,
        Task::WorkingMemory,
    ];

    /// Filename prefix identifying this task (case-sensitive).
    pub fn prefix(self) -> &'static str {
        match self {
            Task::Rest => "rest",
            Task::Motor => "task_motor",
            Task::StoryMath => "task_story_math",
            Task::WorkingMemory => "task_working_memory",
        }
    }

    fn from_dataset(name: &str) -> Option<Task> {
        Task::ALL.into_iter().find(|t| name.starts_with(t.prefix()))
    }
}

/// Concatenated per-task arrays for one participant.
///
/// Each field is `[nodes, timepoints]` with chunks joined along the time
/// axis, or `None` when the scan found no chunks for that task. Fields are
/// declared in the fixed task order: rest, motor, story_math,
/// working_memory.
#[derive(Debug, Default)]
pub struct ParticipantArrays {
    pub rest: Option<Array2<f64>>,
    pub task_motor: Option<Array2<f64>>,
    pub task_story_math: Option<Array2<f64>>,
    pub task_working_memory: Option<Array2<f64>>,
}

impl ParticipantArrays {
    /// Task name / array pairs in the fixed task order.
    pub fn tasks(&self) -> [(&'static str, Option<&Array2<f64>>); 4] {
        [
            (Task::Rest.prefix(), self.rest.as_ref()),
            (Task::Motor.prefix(), self.task_motor.as_ref()),
            (Task::StoryMath.prefix(), self.task_story_math.as_ref()),
            (Task::WorkingMemory.prefix(), self.task_working_memory.as_ref()),
        ]
    }

    pub fn get(&self, task: Task) -> Option<&Array2<f64>> {
        match task {
            Task::Rest => self.rest.as_ref(),
            Task::Motor => self.task_motor.as_ref(),
            Task::StoryMath => self.task_story_math.as_ref(),
            Task::WorkingMemory => self.task_working_memory.as_ref(),
        }
    }

    pub fn take(&mut self, task: Task) -> Option<Array2<f64>> {
        match task {
            Task::Rest => self.rest.take(),
            Task::Motor => self.task_motor.take(),
            Task::StoryMath => self.task_story_math.take(),
            Task::WorkingMemory => self.task_working_memory.take(),
        }
    }

    pub fn set(&mut self, task: Task, arr: Array2<f64>) {
        match task {
            Task::Rest => self.rest = Some(arr),
            Task::Motor => self.task_motor = Some(arr),
            Task::StoryMath => self.task_story_math = Some(arr),
            Task::WorkingMemory => self.task_working_memory = Some(arr),
        }
    }
}

/// Split `rest_105923_2` into (`rest_105923`, 2).
///
/// Stems without a trailing `_<digits>` suffix are chunk 0 and keep their
/// full stem as the dataset key.
fn split_chunk_suffix(stem: &str) -> (&str, u32) {
    match stem.rsplit_once('_') {
        Some((head, digits))
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) =>
        {
            (head, digits.parse().unwrap_or(0))
        }
        _ => (stem, 0),
    }
}

/// Load every chunk for `participant` under `dir` and concatenate per task.
///
/// Scans `<dir>/*_<participant>_*.safetensors`. Files whose dataset key does
/// not start with one of the four task prefixes are skipped. Chunks are
/// joined along the time axis in ascending chunk-index order, independent of
/// filesystem enumeration order.
///
/// # Errors
///
/// Fails when chunks of one task disagree on row (node) count, or when a
/// matching file cannot be read or is missing its tensor key.
pub fn load_participant_arrays(dir: &Path, participant: &str) -> Result<ParticipantArrays> {
    let pattern = format!("{}/*_{}_*.{}", dir.display(), participant, CHUNK_EXT);
    let mut buckets: [Vec<(u32, PathBuf, Array2<f64>)>; 4] = Default::default();

    for entry in glob(&pattern).context("invalid chunk scan pattern")? {
        let path = entry?;
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let (dataset, chunk) = split_chunk_suffix(stem);
        let Some(task) = Task::from_dataset(dataset) else {
            debug!("skipping {}: no task prefix", path.display());
            continue;
        };
        let matrix = read_named_array(&path, dataset)?;
        buckets[task as usize].push((chunk, path, matrix));
    }

    let mut out = ParticipantArrays::default();
    for task in Task::ALL {
        let bucket = &mut buckets[task as usize];
        if bucket.is_empty() {
            continue;
        }
        bucket.sort_by_key(|(chunk, _, _)| *chunk);

        let n_nodes = bucket[0].2.nrows();
        for (_, path, m) in bucket.iter() {
            if m.nrows() != n_nodes {
                bail!(
                    "task {}: {} has {} rows, other chunks have {}",
                    task.prefix(),
                    path.display(),
                    m.nrows(),
                    n_nodes
                );
            }
        }

        let views: Vec<_> = bucket.iter().map(|(_, _, m)| m.view()).collect();
        let joined = concatenate(Axis(1), &views).with_context(|| {
            format!("concatenating {} chunks of task {}", views.len(), task.prefix())
        })?;
        info!(
            "{} {}: {} chunks → [{} x {}]",
            participant,
            task.prefix(),
            views.len(),
            joined.nrows(),
            joined.ncols()
        );
        out.set(task, joined);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_suffix_split() {
        assert_eq!(split_chunk_suffix("rest_105923_2"), ("rest_105923", 2));
        assert_eq!(split_chunk_suffix("task_motor_105923_10"), ("task_motor_105923", 10));
        assert_eq!(split_chunk_suffix("rest_105923"), ("rest", 105923));
        assert_eq!(split_chunk_suffix("rest"), ("rest", 0));
        assert_eq!(split_chunk_suffix("rest_x"), ("rest_x", 0));
    }

    #[test]
    fn task_prefix_matching() {
        assert_eq!(Task::from_dataset("rest_105923"), Some(Task::Rest));
        assert_eq!(Task::from_dataset("task_motor_105923"), Some(Task::Motor));
        assert_eq!(Task::from_dataset("task_story_math_105923"), Some(Task::StoryMath));
        assert_eq!(
            Task::from_dataset("task_working_memory_105923"),
            Some(Task::WorkingMemory)
        );
        // Case-sensitive, unknown names fall through.
        assert_eq!(Task::from_dataset("Rest_105923"), None);
        assert_eq!(Task::from_dataset("emptyroom_105923"), None);
    }

    #[test]
    fn tasks_in_fixed_order() {
        let arrays = ParticipantArrays::default();
        let names: Vec<_> = arrays.tasks().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec!["rest", "task_motor", "task_story_math", "task_working_memory"]
        );
    }
}
