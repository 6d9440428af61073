//! Outlier Detection
//!
//! Outliers are flagged, never dropped from the raw sample set. Min, max and
//! percentiles keep them; only mean and standard deviation use the cleaned set.

use crate::percentiles::compute_percentile;

/// Method for outlier detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlierMethod {
    /// Outliers lie outside `[Q1 - k*IQR, Q3 + k*IQR]`
    Iqr {
        /// IQR multiplier (Tukey fences use 1.5)
        k: f64,
    },
    /// Outliers lie more than `threshold` standard deviations from the mean
    ZScore {
        /// Number of standard deviations
        threshold: f64,
    },
    /// No outlier detection
    None,
}

impl Default for OutlierMethod {
    fn default() -> Self {
        OutlierMethod::Iqr { k: 1.5 }
    }
}

/// Result of outlier analysis
#[derive(Debug, Clone)]
pub struct OutlierAnalysis {
    /// Original samples, in iteration order
    pub all_samples: Vec<f64>,
    /// Samples inside the fences
    pub cleaned_samples: Vec<f64>,
    /// Indices of outlier samples
    pub outlier_indices: Vec<usize>,
    /// Number of outliers below the lower fence
    pub low_outlier_count: usize,
    /// Number of outliers above the upper fence
    pub high_outlier_count: usize,
    /// Lower fence
    pub lower_bound: f64,
    /// Upper fence
    pub upper_bound: f64,
    /// Detection method used
    pub method: OutlierMethod,
}

impl OutlierAnalysis {
    fn unfiltered(samples: &[f64], lower_bound: f64, upper_bound: f64, method: OutlierMethod) -> Self {
        Self {
            all_samples: samples.to_vec(),
            cleaned_samples: samples.to_vec(),
            outlier_indices: Vec::new(),
            low_outlier_count: 0,
            high_outlier_count: 0,
            lower_bound,
            upper_bound,
            method,
        }
    }

    /// Percentage of samples that are outliers
    pub fn outlier_percentage(&self) -> f64 {
        if self.all_samples.is_empty() {
            return 0.0;
        }
        (self.outlier_indices.len() as f64 / self.all_samples.len() as f64) * 100.0
    }

    /// Whether the outlier share exceeds `threshold_pct`
    pub fn is_noisy(&self, threshold_pct: f64) -> bool {
        self.outlier_percentage() > threshold_pct
    }
}

/// Detect outliers in samples using the given method
pub fn detect_outliers(samples: &[f64], method: OutlierMethod) -> OutlierAnalysis {
    if samples.is_empty() {
        return OutlierAnalysis::unfiltered(samples, 0.0, 0.0, method);
    }

    match method {
        OutlierMethod::None => {
            OutlierAnalysis::unfiltered(samples, f64::NEG_INFINITY, f64::INFINITY, method)
        }
        OutlierMethod::Iqr { k } => {
            let q1 = compute_percentile(samples, 25.0);
            let q3 = compute_percentile(samples, 75.0);
            let iqr = q3 - q1;
            partition(samples, q1 - k * iqr, q3 + k * iqr, method)
        }
        OutlierMethod::ZScore { threshold } => {
            let n = samples.len() as f64;
            let mean = samples.iter().sum::<f64>() / n;
            let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
            let std_dev = variance.sqrt();
            if std_dev == 0.0 {
                return OutlierAnalysis::unfiltered(samples, mean, mean, method);
            }
            partition(
                samples,
                mean - threshold * std_dev,
                mean + threshold * std_dev,
                method,
            )
        }
    }
}

fn partition(samples: &[f64], lower_bound: f64, upper_bound: f64, method: OutlierMethod) -> OutlierAnalysis {
    let mut outlier_indices = Vec::new();
    let mut low_outlier_count = 0;
    let mut high_outlier_count = 0;
    let mut cleaned_samples = Vec::with_capacity(samples.len());

    for (i, &sample) in samples.iter().enumerate() {
        if sample < lower_bound {
            outlier_indices.push(i);
            low_outlier_count += 1;
        } else if sample > upper_bound {
            outlier_indices.push(i);
            high_outlier_count += 1;
        } else {
            cleaned_samples.push(sample);
        }
    }

    OutlierAnalysis {
        all_samples: samples.to_vec(),
        cleaned_samples,
        outlier_indices,
        low_outlier_count,
        high_outlier_count,
        lower_bound,
        upper_bound,
        method,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_outliers() {
        let samples = vec![0.010, 0.011, 0.012, 0.013, 0.014];
        let result = detect_outliers(&samples, OutlierMethod::default());
        assert!(result.outlier_indices.is_empty());
        assert_eq!(result.cleaned_samples.len(), 5);
    }

    #[test]
    fn test_cold_start_flagged() {
        let samples = vec![0.250, 0.010, 0.011, 0.012, 0.010, 0.011];
        let result = detect_outliers(&samples, OutlierMethod::default());
        assert_eq!(result.outlier_indices, vec![0]);
        assert_eq!(result.high_outlier_count, 1);
        assert_eq!(result.all_samples.len(), 6);
        assert_eq!(result.cleaned_samples.len(), 5);
    }

    #[test]
    fn test_zscore() {
        let mut samples = vec![1.0; 20];
        samples.push(50.0);
        let result = detect_outliers(&samples, OutlierMethod::ZScore { threshold: 3.0 });
        assert_eq!(result.high_outlier_count, 1);
    }

    #[test]
    fn test_zscore_constant_samples() {
        let samples = vec![2.0; 8];
        let result = detect_outliers(&samples, OutlierMethod::ZScore { threshold: 3.0 });
        assert!(result.outlier_indices.is_empty());
    }

    #[test]
    fn test_no_detection() {
        let samples = vec![1.0, 2.0, 100.0];
        let result = detect_outliers(&samples, OutlierMethod::None);
        assert!(result.outlier_indices.is_empty());
        assert_eq!(result.outlier_percentage(), 0.0);
    }

    #[test]
    fn test_empty_samples() {
        let result = detect_outliers(&[], OutlierMethod::default());
        assert!(result.all_samples.is_empty());
        assert_eq!(result.outlier_percentage(), 0.0);
    }
}
