//! Benchmarks for the serial flocking engine.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use boidsim::{steering_delta, FlockConfig, SerialFlock, Vec2};

fn bench_serial_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("serial_step");

    for population in [100u32, 500, 1000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(population),
            &population,
            |b, &population| {
                let mut flock = SerialFlock::new(FlockConfig::default(), population).unwrap();
                b.iter(|| {
                    flock.step();
                    black_box(flock.boids().len())
                });
            },
        );
    }

    group.finish();
}

fn bench_steering_delta(c: &mut Criterion) {
    let config = FlockConfig::default();
    // A dense cluster so every term of the force law stays hot.
    let others: Vec<(Vec2, Vec2)> = (0..500)
        .map(|i| {
            let t = i as f32 * 0.01;
            (
                Vec2::new(t.sin() * 0.02, t.cos() * 0.02),
                Vec2::new(t.cos() * 0.001, t.sin() * 0.001),
            )
        })
        .collect();

    c.bench_function("steering_delta_500_neighbors", |b| {
        b.iter(|| black_box(steering_delta(Vec2::ZERO, others.iter().copied(), &config)))
    });
}

criterion_group!(benches, bench_serial_step, bench_steering_delta);
criterion_main!(benches);
