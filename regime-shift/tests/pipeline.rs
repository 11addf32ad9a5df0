use rand::{rngs::SmallRng, SeedableRng};
use regime_shift::segmentation::{BottomUp, Dynp, ReturnsBottomUp};
use regime_shift::{
    analyze, classify_changepoints, ConfigError, Detector, HazardRate,
    HybridDetector, ScoreDrivenModel, SdBocpd, VolatilityThreshold,
};
use rv::prelude::*;

fn random_walk(seed: u64, n: usize, vol: f64) -> Vec<f64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let returns: Vec<f64> = Gaussian::new_unchecked(0.0, vol).sample(n - 1, &mut rng);
    std::iter::once(50.0)
        .chain(returns.into_iter().scan(50.0_f64, |p, r| {
            *p *= r.exp();
            Some(*p)
        }))
        .collect()
}

fn assert_valid(changepoints: &[usize], n: usize) {
    assert!(changepoints.windows(2).all(|w| w[0] < w[1]));
    assert!(changepoints.iter().all(|&cp| cp < n));
}

#[test]
fn every_strategy_returns_ordered_in_range_indices() {
    let prices = random_walk(0x1, 300, 0.03);
    let strategies: Vec<Box<dyn Detector>> = vec![
        Box::new(Dynp::default()),
        Box::new(ReturnsBottomUp(BottomUp::new(0.001, 6, 5).unwrap())),
        Box::new(SdBocpd::conservative()),
        Box::new(VolatilityThreshold::default()),
    ];
    for strategy in &strategies {
        let cps = strategy.detect(&prices).unwrap();
        assert_valid(&cps, prices.len());
    }
}

#[test]
fn hybrid_output_is_classified_consistently() {
    let prices = random_walk(0x2, 260, 0.025);
    let labels: Vec<usize> = (0..prices.len()).collect();
    let analysis = analyze(&HybridDetector::default(), &prices, &labels, 2).unwrap();

    assert_valid(&analysis.outcome.changepoints, prices.len());
    let by_index = classify_changepoints(&prices, &analysis.outcome.changepoints, 2);
    assert_eq!(analysis.extrema.peaks, by_index.peaks);
    assert_eq!(analysis.extrema.troughs, by_index.troughs);
    for &p in &analysis.extrema.peaks {
        assert!(analysis.outcome.changepoints.contains(&p));
        assert!(prices[p] > prices[p - 1] && prices[p] > prices[p + 1]);
    }
    for &t in &analysis.extrema.troughs {
        assert!(prices[t] < prices[t - 1] && prices[t] < prices[t + 1]);
    }
}

#[test]
fn default_parameters_validate() {
    let model = ScoreDrivenModel::new(5.0, 0.01, 0.05, 0.9).unwrap();
    assert_eq!(model, ScoreDrivenModel::default());
    let h = HazardRate::new(1.0 / 50.0).unwrap();
    assert_eq!(SdBocpd::new(model, h, 0.5).unwrap(), SdBocpd::default());
}

#[test]
fn invalid_parameters_are_configuration_errors() {
    assert_eq!(
        ScoreDrivenModel::new(5.0, -1.0, 0.05, 0.9),
        Err(ConfigError::Omega(-1.0))
    );
    assert_eq!(
        ScoreDrivenModel::new(5.0, 0.01, 0.05, 1.2),
        Err(ConfigError::Beta(1.2))
    );
    let h = HazardRate::new(0.1).unwrap();
    assert_eq!(
        SdBocpd::new(ScoreDrivenModel::default(), h, 1.5),
        Err(ConfigError::Threshold(1.5))
    );
}
