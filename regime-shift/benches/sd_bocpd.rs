use criterion::*;
use rand::{rngs::SmallRng, SeedableRng};
use regime_shift::SdBocpd;
use rv::prelude::*;

fn bench_sd_bocpd(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(0xABCD);
    let data: Vec<f64> = Gaussian::new_unchecked(0.0, 1.0).sample(2000, &mut rng);

    let mut group = c.benchmark_group("SdBocpd");
    for nelems in (0..2000).step_by(400) {
        let subdata: Vec<f64> = data.iter().take(nelems).copied().collect();

        group.throughput(Throughput::Elements(nelems as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(nelems),
            &subdata,
            |b, data| {
                b.iter(|| {
                    // The run-length vector is never reset on this data, so
                    // this measures the uncapped growth
                    let _res = SdBocpd::default().run(data).unwrap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sd_bocpd);
criterion_main!(benches);
