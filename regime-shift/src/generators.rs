//! Functions to generate random sequences
use rand::Rng;
use rv::dist::Gaussian;
use rv::traits::Rv;

/// Generate zero-mean Gaussian draws whose standard deviation switches from
/// `sigma_1` to `sigma_2` at `switch` into the sequence.
pub fn volatility_jump<R: Rng>(
    rng: &mut R,
    sigma_1: f64,
    sigma_2: f64,
    switch: usize,
    size: usize,
) -> Vec<f64> {
    let g1 = Gaussian::new(0.0, sigma_1).expect("Arguments should be valid");
    let g2 = Gaussian::new(0.0, sigma_2).expect("Arguments should be valid");
    [g1.sample(switch, rng), g2.sample(size - switch, rng)].concat()
}

/// Generate a price path starting at 100 whose log-returns switch volatility
/// at `switch`.
///
/// The path has `size` prices, so `size - 1` returns.
pub fn price_path<R: Rng>(
    rng: &mut R,
    sigma_1: f64,
    sigma_2: f64,
    switch: usize,
    size: usize,
) -> Vec<f64> {
    let returns = volatility_jump(rng, sigma_1, sigma_2, switch, size - 1);
    std::iter::once(100.0)
        .chain(returns.into_iter().scan(100.0_f64, |p, r| {
            *p *= r.exp();
            Some(*p)
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn lengths() {
        let mut rng = StdRng::seed_from_u64(0x12345);
        assert_eq!(volatility_jump(&mut rng, 1.0, 5.0, 500, 1000).len(), 1000);
        let prices = price_path(&mut rng, 0.01, 0.05, 100, 250);
        assert_eq!(prices.len(), 250);
        assert!(prices.iter().all(|p| *p > 0.0));
    }
}
