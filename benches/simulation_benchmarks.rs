//! Benchmarks for the driving simulation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use head_racer::{config::Config, road::RoadGenerator, simulator::DrivingSimulator};
use rand::{rngs::StdRng, SeedableRng};

fn seeded_config() -> Config {
    let mut config = Config::default();
    config.seed = Some(1234);
    config
}

fn benchmark_simulator_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulator");

    // Slow sinusoidal steering while accelerating
    let inputs: Vec<(f64, f64)> = (0..600)
        .map(|i| {
            let t = f64::from(i) / 60.0;
            (0.5 * (t * 0.7).sin(), -0.6)
        })
        .collect();

    group.bench_function("single_tick", |b| {
        let mut sim = DrivingSimulator::new(&seeded_config()).unwrap();
        b.iter(|| black_box(sim.update(black_box(0.1), black_box(-0.5))));
    });

    for ticks in [60usize, 600] {
        group.bench_with_input(BenchmarkId::new("session", ticks), &ticks, |b, &ticks| {
            b.iter(|| {
                let mut sim = DrivingSimulator::new(&seeded_config()).unwrap();
                for &(steering, throttle) in inputs.iter().take(ticks) {
                    black_box(sim.update(steering, throttle));
                }
            });
        });
    }

    group.bench_function("render_state", |b| {
        let mut sim = DrivingSimulator::new(&seeded_config()).unwrap();
        for _ in 0..120 {
            sim.update(0.0, -0.5);
        }
        b.iter(|| black_box(sim.render_state()));
    });

    group.finish();
}

fn benchmark_road(c: &mut Criterion) {
    let mut group = c.benchmark_group("road");
    let config = seeded_config();

    group.bench_function("scroll_full_speed", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        let mut road = RoadGenerator::new(&config, &mut rng);
        b.iter(|| road.scroll(black_box(30.0), &mut rng));
    });

    group.bench_function("bounds_at", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        let road = RoadGenerator::new(&config, &mut rng);
        b.iter(|| black_box(road.bounds_at(black_box(668.0))));
    });

    group.finish();
}

criterion_group!(benches, benchmark_simulator_tick, benchmark_road);
criterion_main!(benches);
