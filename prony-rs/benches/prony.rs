use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use prony_rs::kernel::KernelLifecycle;
use prony_rs::na::Complex;
use prony_rs::signal::filter::design::{prony_dyn, PronyConfig, PronyKernel};
use prony_rs::signal::traits::PronyDesign1D;
use rand::rngs::ThreadRng;
use rand::Rng;

/// Decaying impulse response with random ripple, long enough for an
/// `(order, order)` fit.
fn randomized_response(mut rng: ThreadRng, order: usize) -> Vec<f64> {
    (0..2 * order + 1)
        .map(|n| {
            let decay = 0.92f64.powi(n as i32);
            decay * (1.0 + 0.25 * rng.random_range(-1.0..1.0))
        })
        .collect()
}

fn prony_orders(c: &mut Criterion) {
    let mut group = c.benchmark_group("prony_dyn");
    for order in [2usize, 4, 8, 16, 32] {
        let h = randomized_response(rand::rng(), order);
        group.bench_with_input(BenchmarkId::from_parameter(order), &h, |bench, h| {
            bench.iter(|| prony_dyn(black_box(h.as_slice()), order, order))
        });
    }
    group.finish();
}

fn prony_kernel_complex(c: &mut Criterion) {
    const ORDER: usize = 8;
    let kernel = PronyKernel::try_new(PronyConfig {
        nb: ORDER,
        na: ORDER,
        expected_len: Some(2 * ORDER + 1),
    })
    .expect("prony kernel config should be valid");

    let mut rng = rand::rng();
    let h: Vec<Complex<f64>> = (0..2 * ORDER + 1)
        .map(|n| {
            let decay = 0.9f64.powi(n as i32);
            Complex::new(
                decay * rng.random_range(0.5..1.5),
                decay * rng.random_range(-0.5..0.5),
            )
        })
        .collect();

    c.bench_with_input(
        BenchmarkId::new("prony_kernel_complex", ORDER),
        &h,
        |bench, h| bench.iter(|| kernel.run_alloc(black_box(h))),
    );
}

criterion_group!(benches, prony_orders, prony_kernel_complex);
criterion_main!(benches);
