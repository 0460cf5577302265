use criterion::{criterion_group, criterion_main, Criterion};

use qsim::session::Session;
use qsim::PotentialType;

fn step_benchmark(c: &mut Criterion) {
    let (nx, ny) = (256, 256);
    let dx = 10.0 / nx as f64;
    let mut session = Session::create_session(nx, ny, dx, 0.01, 1.0, 1.0, 1.0).unwrap();
    session.set_potential_type(PotentialType::Single);
    session.initialize(5.0, 5.0, 0.6, 1.0, 0.5);

    let mut group = c.benchmark_group("step_2d");
    group.sample_size(20);
    group.bench_function("step_256x256_with_potential", |b| {
        b.iter(|| {
            session.step();
        })
    });
    group.finish();
}

criterion_group!(benches, step_benchmark);
criterion_main!(benches);
