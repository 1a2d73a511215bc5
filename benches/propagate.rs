use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sgp4_kernel::{GravityModel, Satrec, SatrecArray};

const ISS: (&str, &str) = (
    "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991",
    "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482",
);

const MOLNIYA: (&str, &str) = (
    "1 08195U 75081A   06176.33215444  .00000099  00000-0  11873-3 0   813",
    "2 08195  64.1586 279.0717 6877146 264.7651  20.2257  2.00491383225656",
);

fn satrec(tle: (&str, &str)) -> Satrec {
    Satrec::twoline2rv(tle.0, tle.1, GravityModel::Wgs72).unwrap()
}

/// Random offsets within ±3 days of epoch, in minutes.
fn random_times(rng: &mut StdRng, samples: usize) -> Vec<f64> {
    (0..samples)
        .map(|_| rng.random_range(-4320.0..=4320.0))
        .collect()
}

fn bench_initialization(c: &mut Criterion) {
    c.bench_function("twoline2rv/near_earth", |b| {
        b.iter(|| satrec(black_box(ISS)))
    });
    c.bench_function("twoline2rv/deep_space", |b| {
        b.iter(|| satrec(black_box(MOLNIYA)))
    });
}

fn bench_propagation(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
    let samples = 1_000usize;

    let iss = satrec(ISS);
    c.bench_function("propagate_from_epoch/near_earth", |b| {
        b.iter_batched(
            || random_times(&mut rng, samples),
            |times| {
                for t in times {
                    black_box(iss.propagate_from_epoch(black_box(t)).ok());
                }
            },
            BatchSize::SmallInput,
        )
    });

    let molniya = satrec(MOLNIYA);
    c.bench_function("propagate_from_epoch/resonant", |b| {
        b.iter_batched(
            || random_times(&mut rng, samples),
            |times| {
                for t in times {
                    black_box(molniya.propagate_from_epoch(black_box(t)).ok());
                }
            },
            BatchSize::SmallInput,
        )
    });

    // monotonic sweep, where the resonance checkpoint pays off
    c.bench_function("propagate/resonant_sweep", |b| {
        b.iter_batched(
            || satrec(MOLNIYA),
            |mut sat| {
                for k in 0..samples {
                    black_box(sat.propagate(k as f64 * 10.0).ok());
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_batch(c: &mut Criterion) {
    let mut array = SatrecArray::new(vec![satrec(ISS), satrec(MOLNIYA)]);
    let jd: Vec<f64> = (0..500).map(|k| 2458826.5 + k as f64 * 0.01).collect();
    let fr = vec![0.0; jd.len()];

    c.bench_function("satrec_array/2x500", |b| {
        b.iter(|| black_box(array.sgp4(black_box(&jd), black_box(&fr)).unwrap()))
    });
}

criterion_group!(benches, bench_initialization, bench_propagation, bench_batch);
criterion_main!(benches);
