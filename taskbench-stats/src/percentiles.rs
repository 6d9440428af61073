//! Percentile Computation
//!
//! Percentiles are taken over raw samples. Slow iterations stay in the tail.

/// Tail percentiles of a timing distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentiles {
    /// 50th percentile (median)
    pub p50: f64,
    /// 90th percentile
    pub p90: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
}

/// Compute a single percentile with linear interpolation between nearest ranks.
///
/// Returns `0.0` for an empty slice.
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    match samples.len() {
        0 => return 0.0,
        1 => return samples[0],
        _ => {}
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let rank = (percentile.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(n - 1);
    let fraction = rank - lower as f64;

    sorted[lower] + fraction * (sorted[upper] - sorted[lower])
}

/// Median of the samples (the 50th percentile)
pub fn median(samples: &[f64]) -> f64 {
    compute_percentile(samples, 50.0)
}

/// Compute the standard tail percentiles
pub fn compute_percentiles(samples: &[f64]) -> Percentiles {
    Percentiles {
        p50: compute_percentile(samples, 50.0),
        p90: compute_percentile(samples, 90.0),
        p95: compute_percentile(samples, 95.0),
        p99: compute_percentile(samples, 99.0),
    }
}
