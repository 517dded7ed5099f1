//! Benchmarks for job search.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jobboard_search::{
    approximate_match, normalize_location, MatchOptions, MetroTable, RawJob, SearchIndex,
};

const TITLES: [&str; 6] = [
    "Software Engineer",
    "Senior Backend Engineer",
    "Product Manager",
    "Data Scientist",
    "Staff Frontend Developer",
    "Engineering Manager",
];

const LOCATIONS: [&str; 5] = [
    "Brooklyn, NY",
    "Remote",
    "Palo Alto, CA",
    "Toronto, ON",
    "Austin, TX",
];

fn create_test_jobs(count: usize) -> Vec<RawJob> {
    (0..count)
        .map(|i| {
            RawJob::new(
                TITLES[i % TITLES.len()],
                format!("Company {}", i),
                Some(LOCATIONS[i % LOCATIONS.len()]),
            )
        })
        .collect()
}

fn bench_field_match(c: &mut Criterion) {
    let opts = MatchOptions::default();

    c.bench_function("approximate_match_typo", |b| {
        b.iter(|| {
            approximate_match(
                black_box("softwre enginer"),
                black_box("senior software engineer"),
                &opts,
            )
        })
    });
}

fn bench_normalize_location(c: &mut Criterion) {
    c.bench_function("normalize_location", |b| {
        b.iter(|| normalize_location(black_box(Some("Scarborough, ON"))))
    });
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for size in [10, 100, 1000, 10000].iter() {
        let jobs = create_test_jobs(*size);
        let index = SearchIndex::from_jobs(&jobs, MetroTable::builtin(), MatchOptions::default())
            .expect("valid default options");

        group.bench_with_input(BenchmarkId::new("query", size), size, |b, _| {
            b.iter(|| index.search(black_box("backend enginer")))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_field_match, bench_normalize_location, bench_search);
criterion_main!(benches);
