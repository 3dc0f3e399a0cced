use super::interval::Interval;
use crate::ModelError;

/// Weight of the sample at `position`; an empty weight slice means unit weights.
#[inline]
fn weight_at(weights: &[f64], position: usize) -> f64 {
    if weights.is_empty() {
        1.0
    } else {
        weights[position]
    }
}

/// Incremental impurity bookkeeping for a split boundary moving left to right.
///
/// A calculator is bound to one interval at a time. Positions in
/// `[interval.from, current_position)` form the left child, the rest of the interval
/// forms the right child. Moving the boundary with `update_index` costs time
/// proportional to the distance moved, which keeps an exhaustive scan linear.
///
/// Target and weight arrays are passed in on every call and must be in the same
/// working order as the interval. An empty weight slice means unit weights.
pub trait ImpurityCalculator: Default + Clone + Send + Sync {
    /// Binds the calculator to a fresh set of class codes and an interval.
    ///
    /// # Parameters
    ///
    /// - `target_names` - Sorted distinct class codes (ignored by regression calculators)
    /// - `targets` - Target values in working order
    /// - `weights` - Per-position sample weights, or an empty slice
    /// - `interval` - Positions covered by the current node
    fn init(
        &mut self,
        target_names: &[f64],
        targets: &[f64],
        weights: &[f64],
        interval: Interval,
    ) -> Result<(), ModelError>;

    /// Rebinds the calculator to a new interval, recomputing node totals and resetting
    /// the boundary to the start of the interval.
    fn update_interval(
        &mut self,
        targets: &[f64],
        weights: &[f64],
        interval: Interval,
    ) -> Result<(), ModelError>;

    /// Moves the boundary back to the start of the current interval.
    fn reset(&mut self);

    /// Moves the boundary forward to `new_position`, transferring the samples in
    /// between from the right child to the left child.
    ///
    /// # Errors
    ///
    /// - `ModelError::ProcessingError` if `new_position` lies before the current boundary or past the interval end
    fn update_index(
        &mut self,
        targets: &[f64],
        weights: &[f64],
        new_position: usize,
    ) -> Result<(), ModelError>;

    /// Impurity of the whole interval.
    fn node_impurity(&self) -> f64;

    /// Impurities of the left and right children at the current boundary.
    fn child_impurities(&self) -> (f64, f64);

    /// Improvement of splitting at the current boundary over `parent_impurity`.
    fn impurity_improvement(&self, parent_impurity: f64) -> f64;

    fn weighted_left(&self) -> f64;

    fn weighted_right(&self) -> f64;

    /// Prediction of a leaf covering the whole interval.
    fn leaf_value(&self) -> f64;

    /// Class probabilities of a leaf covering the whole interval, `None` for regression.
    fn leaf_probabilities(&self) -> Option<Vec<f64>>;

    fn target_names(&self) -> &[f64];
}

/// Weighted-count Gini calculator for classification.
///
/// Child impurities are `1 - Σ count² / w²` over weighted class counts, and the
/// improvement of a split is `parent - wL/W · giniL - wR/W · giniR`. With unit
/// weights the child impurities equal the full-scan Gini metric exactly.
#[derive(Debug, Clone, Default)]
pub struct GiniClassificationImpurityCalculator {
    target_names: Vec<f64>,
    interval: Option<Interval>,
    current_position: usize,
    weighted_total: f64,
    weighted_left: f64,
    weighted_right: f64,
    total_counts: Vec<f64>,
    left_counts: Vec<f64>,
    right_counts: Vec<f64>,
}

impl GiniClassificationImpurityCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    fn class_position(&self, target: f64) -> Result<usize, ModelError> {
        self.target_names
            .binary_search_by(|probe| probe.total_cmp(&target))
            .map_err(|_| {
                ModelError::InputValidationError(format!(
                    "Target value {} is not one of the known class codes {:?}",
                    target, self.target_names
                ))
            })
    }

    fn gini(counts: &[f64], weight: f64) -> f64 {
        if weight == 0.0 {
            return 0.0;
        }
        let sum_of_squares = counts.iter().fold(0.0, |acc, &count| acc + count * count);
        1.0 - sum_of_squares / (weight * weight)
    }
}

impl ImpurityCalculator for GiniClassificationImpurityCalculator {
    fn init(
        &mut self,
        target_names: &[f64],
        targets: &[f64],
        weights: &[f64],
        interval: Interval,
    ) -> Result<(), ModelError> {
        self.target_names = target_names.to_vec();
        self.update_interval(targets, weights, interval)
    }

    fn update_interval(
        &mut self,
        targets: &[f64],
        weights: &[f64],
        interval: Interval,
    ) -> Result<(), ModelError> {
        let class_count = self.target_names.len();
        self.total_counts.clear();
        self.total_counts.resize(class_count, 0.0);
        self.weighted_total = 0.0;

        for position in interval.range() {
            let weight = weight_at(weights, position);
            let class = self.class_position(targets[position])?;
            self.total_counts[class] += weight;
            self.weighted_total += weight;
        }

        self.interval = Some(interval);
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.current_position = self.interval.map_or(0, |i| i.from_inclusive());
        self.left_counts.clear();
        self.left_counts.resize(self.total_counts.len(), 0.0);
        self.right_counts.clone_from(&self.total_counts);
        self.weighted_left = 0.0;
        self.weighted_right = self.weighted_total;
    }

    fn update_index(
        &mut self,
        targets: &[f64],
        weights: &[f64],
        new_position: usize,
    ) -> Result<(), ModelError> {
        let interval = self.interval.ok_or(ModelError::ProcessingError(
            "Impurity calculator used before an interval was set".to_string(),
        ))?;
        if new_position < self.current_position {
            return Err(ModelError::ProcessingError(format!(
                "Split boundary cannot move backwards from {} to {}",
                self.current_position, new_position
            )));
        }
        if new_position > interval.to_exclusive() {
            return Err(ModelError::ProcessingError(format!(
                "Split boundary {} lies past the interval end {}",
                new_position,
                interval.to_exclusive()
            )));
        }

        for position in self.current_position..new_position {
            let weight = weight_at(weights, position);
            let class = self.class_position(targets[position])?;
            self.left_counts[class] += weight;
            self.right_counts[class] -= weight;
            self.weighted_left += weight;
            self.weighted_right -= weight;
        }

        self.current_position = new_position;
        Ok(())
    }

    fn node_impurity(&self) -> f64 {
        Self::gini(&self.total_counts, self.weighted_total)
    }

    fn child_impurities(&self) -> (f64, f64) {
        (
            Self::gini(&self.left_counts, self.weighted_left),
            Self::gini(&self.right_counts, self.weighted_right),
        )
    }

    fn impurity_improvement(&self, parent_impurity: f64) -> f64 {
        if self.weighted_total == 0.0 {
            return 0.0;
        }
        let (left, right) = self.child_impurities();
        parent_impurity
            - (self.weighted_left / self.weighted_total) * left
            - (self.weighted_right / self.weighted_total) * right
    }

    fn weighted_left(&self) -> f64 {
        self.weighted_left
    }

    fn weighted_right(&self) -> f64 {
        self.weighted_right
    }

    /// Majority class; ties go to the smallest class code.
    fn leaf_value(&self) -> f64 {
        let mut best = 0;
        for (class, &count) in self.total_counts.iter().enumerate() {
            if count > self.total_counts[best] {
                best = class;
            }
        }
        self.target_names.get(best).copied().unwrap_or(0.0)
    }

    /// Laplace-adjusted class probabilities `(count + 1) / (W + k)`.
    fn leaf_probabilities(&self) -> Option<Vec<f64>> {
        let denominator = self.weighted_total + self.target_names.len() as f64;
        Some(
            self.total_counts
                .iter()
                .map(|&count| (count + 1.0) / denominator)
                .collect(),
        )
    }

    fn target_names(&self) -> &[f64] {
        &self.target_names
    }
}

/// Weighted sum and sum-of-squares calculator for regression.
///
/// Impurities are population variances. The improvement of a split is the
/// between-group sum of squares `wL · wR · (meanL - meanR)² / (wL + wR)`, which does
/// not depend on the parent impurity.
#[derive(Debug, Clone, Default)]
pub struct RegressionImpurityCalculator {
    interval: Option<Interval>,
    current_position: usize,
    weighted_total: f64,
    weighted_sum: f64,
    weighted_sum_of_squares: f64,
    weighted_left: f64,
    weighted_left_sum: f64,
    weighted_left_sum_of_squares: f64,
}

impl RegressionImpurityCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    fn variance(sum: f64, sum_of_squares: f64, weight: f64) -> f64 {
        if weight <= 0.0 {
            return 0.0;
        }
        let mean = sum / weight;
        sum_of_squares / weight - mean * mean
    }
}

impl ImpurityCalculator for RegressionImpurityCalculator {
    fn init(
        &mut self,
        _target_names: &[f64],
        targets: &[f64],
        weights: &[f64],
        interval: Interval,
    ) -> Result<(), ModelError> {
        self.update_interval(targets, weights, interval)
    }

    fn update_interval(
        &mut self,
        targets: &[f64],
        weights: &[f64],
        interval: Interval,
    ) -> Result<(), ModelError> {
        self.weighted_total = 0.0;
        self.weighted_sum = 0.0;
        self.weighted_sum_of_squares = 0.0;

        for position in interval.range() {
            let weight = weight_at(weights, position);
            let target = targets[position];
            self.weighted_sum += weight * target;
            self.weighted_sum_of_squares += weight * target * target;
            self.weighted_total += weight;
        }

        self.interval = Some(interval);
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.current_position = self.interval.map_or(0, |i| i.from_inclusive());
        self.weighted_left = 0.0;
        self.weighted_left_sum = 0.0;
        self.weighted_left_sum_of_squares = 0.0;
    }

    fn update_index(
        &mut self,
        targets: &[f64],
        weights: &[f64],
        new_position: usize,
    ) -> Result<(), ModelError> {
        let interval = self.interval.ok_or(ModelError::ProcessingError(
            "Impurity calculator used before an interval was set".to_string(),
        ))?;
        if new_position < self.current_position {
            return Err(ModelError::ProcessingError(format!(
                "Split boundary cannot move backwards from {} to {}",
                self.current_position, new_position
            )));
        }
        if new_position > interval.to_exclusive() {
            return Err(ModelError::ProcessingError(format!(
                "Split boundary {} lies past the interval end {}",
                new_position,
                interval.to_exclusive()
            )));
        }

        for position in self.current_position..new_position {
            let weight = weight_at(weights, position);
            let target = targets[position];
            self.weighted_left_sum += weight * target;
            self.weighted_left_sum_of_squares += weight * target * target;
            self.weighted_left += weight;
        }

        self.current_position = new_position;
        Ok(())
    }

    fn node_impurity(&self) -> f64 {
        Self::variance(
            self.weighted_sum,
            self.weighted_sum_of_squares,
            self.weighted_total,
        )
    }

    fn child_impurities(&self) -> (f64, f64) {
        (
            Self::variance(
                self.weighted_left_sum,
                self.weighted_left_sum_of_squares,
                self.weighted_left,
            ),
            Self::variance(
                self.weighted_sum - self.weighted_left_sum,
                self.weighted_sum_of_squares - self.weighted_left_sum_of_squares,
                self.weighted_right(),
            ),
        )
    }

    fn impurity_improvement(&self, _parent_impurity: f64) -> f64 {
        let weighted_left = self.weighted_left;
        let weighted_right = self.weighted_right();
        if weighted_left <= 0.0 || weighted_right <= 0.0 {
            return 0.0;
        }

        let mean_left = self.weighted_left_sum / weighted_left;
        let mean_right = (self.weighted_sum - self.weighted_left_sum) / weighted_right;
        let difference = mean_left - mean_right;

        weighted_left * weighted_right * difference * difference / (weighted_left + weighted_right)
    }

    fn weighted_left(&self) -> f64 {
        self.weighted_left
    }

    fn weighted_right(&self) -> f64 {
        self.weighted_total - self.weighted_left
    }

    fn leaf_value(&self) -> f64 {
        if self.weighted_total > 0.0 {
            self.weighted_sum / self.weighted_total
        } else {
            0.0
        }
    }

    fn leaf_probabilities(&self) -> Option<Vec<f64>> {
        None
    }

    fn target_names(&self) -> &[f64] {
        &[]
    }
}
