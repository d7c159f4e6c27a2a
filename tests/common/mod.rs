//! Shared helpers for the integration suite.

use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber honoring `RUST_LOG`; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Gaussian samples that drive a security's price through `targets`, given
/// the multiplicative update `p' = p + p * g`.
///
/// The running price is advanced with the same arithmetic the simulation
/// uses, so later samples compensate for floating-point drift in earlier
/// steps.
pub fn gaussians_for_price_path(start: f64, targets: &[f64]) -> Vec<f64> {
    let mut current = start;
    let mut samples = Vec::with_capacity(targets.len());
    for &target in targets {
        let sample = (target - current) / current;
        samples.push(sample);
        let change = current * sample;
        current += change;
    }
    samples
}
