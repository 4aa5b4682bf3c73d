//! Benchmarks pour le parsing HURDAT2

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::io::Cursor;

use hurdat2::{EmptyNamePolicy, StormReader};

const KAREN: &str = include_str!("../tests/data/karen.txt");

fn bench_parse_storm_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_storm_block");
    group.throughput(Throughput::Bytes(KAREN.len() as u64));

    group.bench_function("karen_al122007", |b| {
        b.iter(|| {
            let reader = StormReader::new(Cursor::new(black_box(KAREN)), EmptyNamePolicy::Unnamed);
            let storms: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
            black_box(storms)
        })
    });

    group.finish();
}

fn bench_parse_observation_line(c: &mut Criterion) {
    let line = "20210829, 1655, L, HU, 29.1N,  90.2W, 130,  931,  130,  110,   80,  110,   70,   60,   40,   60,   45,   35,   20,   30,   10";

    let mut group = c.benchmark_group("parse_observation_line");
    group.throughput(Throughput::Bytes(line.len() as u64));

    group.bench_function("ida_landfall", |b| {
        b.iter(|| hurdat2::parser::parse_observation(black_box(line)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_parse_storm_block, bench_parse_observation_line);
criterion_main!(benches);
