use super::interval::Interval;
use crate::math::{entropy, gini, sample_variance};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Full-scan impurity of the targets covered by an interval.
///
/// Implementations are evaluated from scratch on every call. They are used by the
/// `find_best_split` entry point of the split searchers and by the CART learner.
/// Results are only required to be meaningful for non-empty intervals.
pub trait ImpurityMetric: Send + Sync {
    /// Computes the impurity of `targets[interval]`.
    ///
    /// # Parameters
    ///
    /// - `targets` - Target values in working order
    /// - `interval` - Positions of `targets` to evaluate
    ///
    /// # Returns
    ///
    /// - `f64` - Impurity, lower is more homogeneous
    fn impurity(&self, targets: &[f64], interval: Interval) -> f64;

    /// Whether leaves built with this metric hold a class code rather than a mean.
    fn is_classification(&self) -> bool;
}

/// Gini impurity over class proportions, `1 - Σ count² / n²`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiniImpurityMetric;

/// Shannon entropy in bits over class proportions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntropyImpurityMetric;

/// Unbiased sample variance, `(Σy² - (Σy)²/n) / (n - 1)`; 0.0 for a single value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceImpurityMetric;

impl ImpurityMetric for GiniImpurityMetric {
    fn impurity(&self, targets: &[f64], interval: Interval) -> f64 {
        gini(&ArrayView1::from(interval.slice(targets)))
    }

    fn is_classification(&self) -> bool {
        true
    }
}

impl ImpurityMetric for EntropyImpurityMetric {
    fn impurity(&self, targets: &[f64], interval: Interval) -> f64 {
        entropy(&ArrayView1::from(interval.slice(targets)))
    }

    fn is_classification(&self) -> bool {
        true
    }
}

impl ImpurityMetric for VarianceImpurityMetric {
    fn impurity(&self, targets: &[f64], interval: Interval) -> f64 {
        sample_variance(&ArrayView1::from(interval.slice(targets)))
    }

    fn is_classification(&self) -> bool {
        false
    }
}
