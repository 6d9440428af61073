//! Summary Statistics
//!
//! Mean and standard deviation come from CLEANED samples. Median, min, max and
//! percentiles come from ALL samples.

use crate::outliers::{OutlierAnalysis, OutlierMethod, detect_outliers};
use crate::percentiles::{Percentiles, compute_percentiles};

/// Summary of a set of per-iteration timings (seconds)
#[derive(Debug, Clone)]
pub struct SummaryStatistics {
    /// Mean of cleaned samples
    pub mean: f64,
    /// Median of all samples
    pub median: f64,
    /// Sample standard deviation of cleaned samples
    pub std_dev: f64,
    /// Fastest sample
    pub min: f64,
    /// Slowest sample
    pub max: f64,
    /// Tail percentiles of all samples
    pub percentiles: Percentiles,
    /// Number of samples
    pub sample_count: usize,
    /// Number of flagged outliers
    pub outlier_count: usize,
    /// Full outlier analysis
    pub outlier_analysis: OutlierAnalysis,
}

/// Compute summary statistics
pub fn compute_summary(samples: &[f64], outlier_method: OutlierMethod) -> SummaryStatistics {
    let analysis = detect_outliers(samples, outlier_method);
    let cleaned = &analysis.cleaned_samples;

    let mean = if cleaned.is_empty() {
        0.0
    } else {
        cleaned.iter().sum::<f64>() / cleaned.len() as f64
    };

    let std_dev = if cleaned.len() < 2 {
        0.0
    } else {
        let variance =
            cleaned.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (cleaned.len() - 1) as f64;
        variance.sqrt()
    };

    let min = samples.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = samples.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let percentiles = compute_percentiles(samples);

    SummaryStatistics {
        mean,
        median: percentiles.p50,
        std_dev,
        min,
        max,
        percentiles,
        sample_count: samples.len(),
        outlier_count: analysis.outlier_indices.len(),
        outlier_analysis: analysis,
    }
}

impl SummaryStatistics {
    /// Coefficient of variation in percent
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }

    /// Whether the coefficient of variation is below `cv_threshold` percent
    pub fn is_stable(&self, cv_threshold: f64) -> bool {
        self.coefficient_of_variation() < cv_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_summary() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let summary = compute_summary(&samples, OutlierMethod::default());

        assert!((summary.mean - 3.0).abs() < 1e-12);
        assert!((summary.median - 3.0).abs() < 1e-12);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.sample_count, 5);
    }

    #[test]
    fn test_outlier_excluded_from_mean_only() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = compute_summary(&samples, OutlierMethod::default());

        assert!(summary.mean < 10.0);
        assert_eq!(summary.max, 100.0);
        assert!(summary.percentiles.p99 > 50.0);
        assert_eq!(summary.outlier_count, 1);
    }

    #[test]
    fn test_constant_samples_are_stable() {
        let samples = vec![0.02; 5];
        let summary = compute_summary(&samples, OutlierMethod::None);
        assert_eq!(summary.coefficient_of_variation(), 0.0);
        assert!(summary.is_stable(1.0));
    }

    #[test]
    fn test_empty_samples() {
        let summary = compute_summary(&[], OutlierMethod::default());
        assert_eq!(summary.sample_count, 0);
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.min, 0.0);
    }
}
