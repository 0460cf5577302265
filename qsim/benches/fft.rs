use criterion::{criterion_group, criterion_main, Criterion};

use qsim::complex_field::ComplexField;
use qsim::fft::{Fft2D, FftPlan1D};

fn fft1d_benchmark(c: &mut Criterion) {
    let n = 1024;
    let plan = FftPlan1D::new(n).unwrap();
    let mut data = vec![0.0; 2 * n];
    for (i, v) in data.iter_mut().enumerate() {
        *v = ((i as f64) * 0.013).sin();
    }

    c.bench_function("fft1d_forward_1024", |b| {
        b.iter(|| {
            plan.forward(&mut data);
        })
    });
}

fn fft2d_benchmark(c: &mut Criterion) {
    let (nx, ny) = (128, 128);
    let mut fft = Fft2D::new(nx, ny).unwrap();
    let mut field = ComplexField::new(nx, ny).unwrap();
    for j in 0..ny {
        for i in 0..nx {
            field
                .set(i, j, num_complex::Complex64::new((i + j) as f64 * 0.01, 0.0))
                .unwrap();
        }
    }

    let mut group = c.benchmark_group("fft2d");
    group.sample_size(20);
    group.bench_function("forward_128x128", |b| {
        b.iter(|| {
            fft.forward(&mut field).unwrap();
        })
    });
    group.finish();
}

criterion_group!(benches, fft1d_benchmark, fft2d_benchmark);
criterion_main!(benches);
