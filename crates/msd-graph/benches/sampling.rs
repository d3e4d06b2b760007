use criterion::{black_box, criterion_group, criterion_main, Criterion};
use msd_core::{DesignInput, RngHandle};
use msd_graph::{ConstraintGraph, DependencyGraph, ResampleStrategy};

fn sampling_bench(c: &mut Criterion) {
    let input = DesignInput::builtin();
    let mut graph = ConstraintGraph::new(&input.structures, &input.constraint).unwrap();
    let mut rng = RngHandle::from_seed(7);

    c.bench_function("construct_builtin", |b| {
        b.iter(|| black_box(ConstraintGraph::new(&input.structures, &input.constraint).unwrap()));
    });

    c.bench_function("sample_full", |b| {
        b.iter(|| black_box(graph.sample(&mut rng).unwrap()));
    });

    for (label, strategy) in [
        ("resample_single", ResampleStrategy::Single),
        ("resample_local", ResampleStrategy::Local),
        ("resample_global", ResampleStrategy::Global),
        ("resample_strelem", ResampleStrategy::StructuralElement),
    ] {
        c.bench_function(label, |b| {
            b.iter(|| {
                let step = graph.resample(strategy, &mut rng).unwrap();
                graph.revert(step.changed).unwrap();
                black_box(step)
            });
        });
    }
}

criterion_group!(benches, sampling_bench);
criterion_main!(benches);
