use criterion::{criterion_group, criterion_main, Criterion};
use megprep::{decimate, load_participant_arrays, write_chunk};
use ndarray::Array2;
use std::hint::black_box;

fn bench_load_participant(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    for chunk in 0..4 {
        let data = Array2::from_shape_fn((64, 2048), |(r, t)| {
            ((r * 31 + t) as f64 * 0.01).sin()
        });
        let path = dir.path().join(format!("rest_100307_{chunk}.safetensors"));
        write_chunk(&path, "rest_100307", &data).unwrap();
    }
    c.bench_function("load_participant_arrays (4 chunks, 64×2048)", |b| {
        b.iter(|| {
            let arrays = load_participant_arrays(black_box(dir.path()), "100307").unwrap();
            black_box(arrays.rest.map(|m| m.ncols()))
        })
    });
}

fn bench_decimate(c: &mut Criterion) {
    let data = Array2::from_shape_fn((64, 8192), |(r, t)| {
        ((r + 1) as f64 * 0.007 * t as f64).sin()
    });
    c.bench_function("decimate ×4 (64×8192)", |b| {
        b.iter(|| {
            let out = decimate(black_box(&data), 4);
            black_box(out.ncols())
        })
    });
}

criterion_group!(benches, bench_load_participant, bench_decimate);
criterion_main!(benches);
