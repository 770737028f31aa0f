use criterion::{Criterion, black_box, criterion_group, criterion_main};
use partsys_tools::tab::{
    parser::parse_file_str,
    serializer::format_file,
    types::{EmitterSpec, SystemSpec},
};

/// A file of `count` systems, each with two fully-populated emitters
fn synthetic_file(count: usize) -> String {
    let specs: Vec<SystemSpec> = (0..count)
        .map(|i| {
            let mut system = SystemSpec::new(&format!("system_{i}"));
            system.emitters.push(EmitterSpec::with_defaults("base"));
            system.emitters.push(EmitterSpec::with_defaults("glow"));
            system
        })
        .collect();

    format_file(&specs)
}

fn parse_benchmark(c: &mut Criterion) {
    let contents = synthetic_file(100);

    c.bench_function("parse_file_100_systems", |b| {
        b.iter(|| parse_file_str(black_box(&contents)).unwrap())
    });
}

criterion_group!(benches, parse_benchmark);
criterion_main!(benches);
