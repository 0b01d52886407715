//! Benchmarks for quickjump core operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use quickjump::core::{
    CandidatePath, ExclusionFilter, PickerConfig, Ranker, RelPath, WorkspaceRoot,
};

const DIRS: &[&str] = &[
    "src", "core", "ui", "net", "db", "api", "tests", "docs", "tools", "scripts",
];
const STEMS: &[&str] = &[
    "parser", "client", "server", "config", "session", "history", "render", "input", "walker",
    "schema",
];
const EXTS: &[&str] = &["rs", "ts", "py", "go"];

/// Generate N deterministic synthetic candidate paths.
fn generate_candidates(n: usize) -> Vec<CandidatePath> {
    let root = WorkspaceRoot::open(std::path::Path::new("/")).unwrap();
    (0..n)
        .map(|i| {
            let rel = format!(
                "{}/{}/{}{}.{}",
                DIRS[i % DIRS.len()],
                DIRS[(i / DIRS.len()) % DIRS.len()],
                STEMS[i % STEMS.len()],
                i,
                EXTS[i % EXTS.len()],
            );
            CandidatePath::from_rel(&root, RelPath::new(rel))
        })
        .collect()
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ranker::rank");
    let config = PickerConfig::default();
    let filter = ExclusionFilter::compile(&config);

    for size in [1_000, 10_000, 50_000] {
        let candidates = generate_candidates(size);
        let mut ranker = Ranker::new();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &candidates,
            |b, candidates| {
                b.iter(|| ranker.rank(black_box(candidates), "cfg", &config, &filter));
            },
        );
    }

    group.finish();
}

fn bench_rank_query_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ranker::rank/query_length");
    let config = PickerConfig::default();
    let filter = ExclusionFilter::compile(&config);
    let candidates = generate_candidates(10_000);

    for query in ["se", "sess", "session", "srvsession"] {
        let mut ranker = Ranker::new();
        group.bench_with_input(BenchmarkId::from_parameter(query), &query, |b, &query| {
            b.iter(|| ranker.rank(black_box(&candidates), query, &config, &filter));
        });
    }

    group.finish();
}

fn bench_empty_query_passthrough(c: &mut Criterion) {
    let config = PickerConfig::default();
    let filter = ExclusionFilter::compile(&config);
    let candidates = generate_candidates(50_000);
    let mut ranker = Ranker::new();

    c.bench_function("Ranker::rank/empty_query_50k", |b| {
        b.iter(|| ranker.rank(black_box(&candidates), "", &config, &filter));
    });
}

criterion_group!(
    benches,
    bench_rank,
    bench_rank_query_length,
    bench_empty_query_passthrough
);
criterion_main!(benches);
