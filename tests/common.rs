/// Shared helpers: fabricate synthetic chunk files in a temp directory.
use megprep::write_chunk;
use ndarray::Array2;
use std::path::{Path, PathBuf};

#[allow(unused)]
pub fn chunk_path(dir: &Path, task: &str, participant: &str, chunk: u32) -> PathBuf {
    dir.join(format!("{task}_{participant}_{chunk}.safetensors"))
}

#[allow(unused)]
/// Write a `[nodes, len]` chunk whose elements are `chunk * 100 + column`,
/// so concatenation order is visible in the values. Returns the array.
pub fn write_indexed_chunk(
    dir: &Path,
    task: &str,
    participant: &str,
    chunk: u32,
    nodes: usize,
    len: usize,
) -> Array2<f64> {
    let data = Array2::from_shape_fn((nodes, len), |(_, t)| chunk as f64 * 100.0 + t as f64);
    let key = format!("{task}_{participant}");
    write_chunk(&chunk_path(dir, task, participant, chunk), &key, &data).unwrap();
    data
}

#[allow(unused)]
/// Write a `[nodes, len]` chunk with a deterministic oscillatory signal.
pub fn write_signal_chunk(
    dir: &Path,
    task: &str,
    participant: &str,
    chunk: u32,
    nodes: usize,
    len: usize,
) -> Array2<f64> {
    let data = Array2::from_shape_fn((nodes, len), |(r, t)| {
        ((r + 1) as f64 * 0.37 + t as f64 * 0.11).sin() * 40.0 + r as f64
    });
    let key = format!("{task}_{participant}");
    write_chunk(&chunk_path(dir, task, participant, chunk), &key, &data).unwrap();
    data
}
