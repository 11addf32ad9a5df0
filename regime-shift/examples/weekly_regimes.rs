//! Detect regime changes in a synthetic weekly price series and report which
//! of them are peaks or troughs.
//!
//! Run with `RUST_LOG=debug` to see each strategy of the hybrid detector and
//! every classified extremum.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use regime_shift::{analyze, utils, HybridDetector, SdBocpd};
use rv::prelude::*;
use tracing_subscriber::EnvFilter;

/// Log-returns drawn in regimes of alternating drift and volatility.
fn regime_returns<R: Rng>(rng: &mut R, regimes: &[(f64, f64, usize)]) -> Vec<f64> {
    regimes
        .iter()
        .flat_map(|&(drift, vol, len)| {
            let draws: Vec<f64> =
                Gaussian::new_unchecked(drift, vol).sample(len, &mut *rng);
            draws
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = SmallRng::seed_from_u64(0xABCD);
    let returns = regime_returns(
        &mut rng,
        &[
            (0.004, 0.02, 60),
            (-0.006, 0.045, 40),
            (0.002, 0.015, 70),
            (0.008, 0.03, 50),
        ],
    );

    let prices: Vec<f64> = std::iter::once(100.0)
        .chain(returns.iter().scan(100.0_f64, |p, r| {
            *p *= r.exp();
            Some(*p)
        }))
        .collect();
    let weeks: Vec<String> = (0..prices.len())
        .map(|i| format!("{}-W{:02}", 2020 + i / 52, i % 52 + 1))
        .collect();

    let analysis = analyze(&HybridDetector::default(), &prices, &weeks, 2)?;

    println!(
        "Change points ({}): {:?}",
        analysis.outcome.strategy.as_deref().unwrap_or("none"),
        analysis.outcome.changepoints
    );
    println!("Peaks   = {:#?}", analysis.extrema.peaks);
    println!("Troughs = {:#?}", analysis.extrema.troughs);

    // Volatility traces for plotting
    let sd = SdBocpd::conservative().run(&returns)?;
    utils::write_data_and_traces("weekly_regimes_output", &returns, &sd)?;

    Ok(())
}
