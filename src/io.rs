//! Safetensors chunk-file I/O.
//!
//! A chunk file is a plain safetensors container: a little-endian `u64`
//! header length, a JSON header mapping tensor names to dtype/shape/offsets,
//! then the raw little-endian tensor bytes. Each recording chunk holds a
//! single 2-D tensor of shape `[nodes, timepoints]` keyed by
//! `<task>_<participant>` (the filename stem minus its chunk suffix).
use anyhow::{bail, Context, Result};
use ndarray::Array2;
use std::collections::HashMap;
use std::path::Path;

// ── Low-level safetensors parser (no dependency on the `safetensors` crate's
//    tensor types — we just need raw bytes → ndarray). ─────────────────────────

fn parse_header(bytes: &[u8]) -> Result<(HashMap<String, serde_json::Value>, usize)> {
    if bytes.len() < 8 {
        bail!("safetensors file too small");
    }
    let n = u64::from_le_bytes(bytes[..8].try_into().unwrap()) as usize;
    if bytes.len() < 8 + n {
        bail!("safetensors header truncated");
    }
    let header: HashMap<String, serde_json::Value> =
        serde_json::from_slice(&bytes[8..8 + n])
            .context("failed to parse safetensors header")?;
    Ok((header, 8 + n))
}

fn shape_of(entry: &serde_json::Value) -> Vec<usize> {
    entry["shape"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap() as usize)
        .collect()
}

/// Read the 2-D tensor stored under `key`, widened to `f64`.
///
/// Accepts F32 and F64 on-disk dtypes; anything else is an error, as is a
/// missing key or a tensor that is not 2-D.
pub fn read_named_array(path: &Path, key: &str) -> Result<Array2<f64>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let (header, data_start) = parse_header(&bytes)?;

    let entry = header
        .get(key)
        .with_context(|| format!("missing tensor '{key}' in {}", path.display()))?;
    let shape = shape_of(entry);
    if shape.len() != 2 {
        bail!(
            "tensor '{key}' in {} is {}-D, expected 2-D",
            path.display(),
            shape.len()
        );
    }

    let offsets = entry["data_offsets"].as_array().unwrap();
    let s = offsets[0].as_u64().unwrap() as usize;
    let e = offsets[1].as_u64().unwrap() as usize;
    if data_start + e > bytes.len() || s > e {
        bail!("tensor '{key}' offsets out of bounds in {}", path.display());
    }
    let raw = &bytes[data_start + s..data_start + e];

    let dtype = entry["dtype"].as_str().unwrap_or("");
    let vals: Vec<f64> = match dtype {
        "F32" => raw
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes(b.try_into().unwrap()) as f64)
            .collect(),
        "F64" => raw
            .chunks_exact(8)
            .map(|b| f64::from_le_bytes(b.try_into().unwrap()))
            .collect(),
        other => bail!("tensor '{key}' has unsupported dtype {other:?}"),
    };

    Array2::from_shape_vec((shape[0], shape[1]), vals)
        .with_context(|| format!("tensor '{key}' data does not match its shape"))
}

// ── Chunk writer ──────────────────────────────────────────────────────────────

/// Safetensors file builder handling F32 and F64 tensors.
///
/// Usage:
/// ```rust,no_run
/// use megprep::io::ChunkWriter;
/// use std::path::Path;
/// let mut w = ChunkWriter::new();
/// w.add_f64("rest_105923", &[1.0f64, 2.0, 3.0], &[1, 3]);
/// w.write(Path::new("/tmp/rest_105923_0.safetensors")).unwrap();
/// ```
pub struct ChunkWriter {
    entries: Vec<(String, Vec<u8>, &'static str, Vec<usize>)>,
}

impl ChunkWriter {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn add_f32(&mut self, name: &str, data: &[f32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F32", shape.to_vec()));
    }

    pub fn add_f64(&mut self, name: &str, data: &[f64], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F64", shape.to_vec()));
    }

    pub fn add_f64_arr2(&mut self, name: &str, arr: &Array2<f64>) {
        let data: Vec<f64> = arr.iter().copied().collect();
        self.add_f64(name, &data, &[arr.nrows(), arr.ncols()]);
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        use std::io::Write;
        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, dtype, shape) in &self.entries {
            header_map.insert(name.clone(), serde_json::json!({
                "dtype": dtype,
                "shape": shape,
                "data_offsets": [offset, offset + data.len()],
            }));
            offset += data.len();
        }
        let hdr_bytes = serde_json::to_vec(&header_map)?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        let padded: Vec<u8> = hdr_bytes.into_iter()
            .chain(std::iter::repeat(b' ').take(pad))
            .collect();
        let mut f = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        f.write_all(&(padded.len() as u64).to_le_bytes())?;
        f.write_all(&padded)?;
        for (_, data, _, _) in &self.entries {
            f.write_all(data)?;
        }
        Ok(())
    }
}

impl Default for ChunkWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a single-tensor chunk file: `arr` stored under `key`.
pub fn write_chunk(path: &Path, key: &str, arr: &Array2<f64>) -> Result<()> {
    let mut w = ChunkWriter::new();
    w.add_f64_arr2(key, arr);
    w.write(path)
}
