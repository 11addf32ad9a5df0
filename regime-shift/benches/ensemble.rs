use criterion::*;
use rand::{rngs::SmallRng, SeedableRng};
use regime_shift::segmentation::Dynp;
use regime_shift::{Detector, HybridDetector};
use rv::prelude::*;

fn price_path(n: usize) -> Vec<f64> {
    let mut rng = SmallRng::seed_from_u64(0xABCD);
    let returns: Vec<f64> = Gaussian::new_unchecked(0.0, 0.02).sample(n, &mut rng);
    returns
        .into_iter()
        .scan(100.0_f64, |p, r| {
            *p *= r.exp();
            Some(*p)
        })
        .collect()
}

fn bench_ensemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ensemble");
    for nelems in [130, 260, 520] {
        let prices = price_path(nelems);

        group.throughput(Throughput::Elements(nelems as u64));
        group.bench_with_input(
            BenchmarkId::new("dynp", nelems),
            &prices,
            |b, prices| b.iter(|| Dynp::default().detect(prices)),
        );
        group.bench_with_input(
            BenchmarkId::new("hybrid", nelems),
            &prices,
            |b, prices| {
                let detector = HybridDetector::default();
                b.iter(|| detector.detect(prices));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_ensemble);
criterion_main!(benches);
