//! Benchmarks for plan resolution
//!
//! Measures template resolution and batch plan building over growing file
//! lists, plus glob expansion against a populated temporary directory.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashMap;
use std::hint::black_box;
use tempfile::TempDir;
use vicon::plan::{build_batch_plan, resolve, GlobExpander};

const TRANSCODE: &str =
    "ffmpeg -hide_banner -nostdin -i {{input}} -c:v libx264 -crf 23 -preset slow -pix_fmt yuv420p {{output}}";

fn bench_resolve(c: &mut Criterion) {
    let variables: HashMap<String, String> = [
        ("input", "clips/holiday/day-01.mov"),
        ("dir", "clips/holiday"),
        ("stem", "day-01"),
        ("output", "clips/holiday/day-01_converted.mp4"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    c.bench_function("resolve_transcode_template", |b| {
        b.iter(|| resolve(black_box(TRANSCODE), black_box(&variables)))
    });
}

fn bench_build_batch_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_batch_plan");
    let templates = vec![
        "ffmpeg -hide_banner -nostdin -i {{input}} -vf palettegen /tmp/{{stem}}_palette.png"
            .to_string(),
        "ffmpeg -hide_banner -nostdin -i {{input}} -i /tmp/{{stem}}_palette.png -lavfi paletteuse {{output}}"
            .to_string(),
    ];

    for size in &[10, 100, 1000, 10000] {
        let files: Vec<String> = (0..*size).map(|i| format!("clips/video_{i}.mp4")).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &files, |b, files| {
            b.iter(|| build_batch_plan(black_box(files), &templates, "{{dir}}/{{stem}}.gif"))
        });
    }
    group.finish();
}

fn bench_glob_expand(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    for i in 0..500 {
        let ext = if i % 2 == 0 { "mov" } else { "jpg" };
        std::fs::write(dir.path().join(format!("file_{i}.{ext}")), b"").unwrap();
    }
    let expander = GlobExpander::with_base_dir(dir.path().to_path_buf());

    c.bench_function("glob_expand_500_files", |b| {
        b.iter(|| expander.expand(black_box(&["*.mov", "file_1*.mov"])).unwrap())
    });
}

criterion_group!(benches, bench_resolve, bench_build_batch_plan, bench_glob_expand);
criterion_main!(benches);
