use super::gbm_split::GbmSplitInfo;
use crate::math::{median, sigmoid};
use ndarray::ArrayView1;
use std::fmt::Debug;

/// Loss function driving a gradient boosted tree.
///
/// A loss supplies the model's starting value, the residuals each tree is fit to,
/// and the incremental split statistics the tree builder scans with. Losses whose
/// optimal leaf value is not the residual mean (e.g. absolute loss) re-estimate
/// leaf values after a split is chosen.
pub trait GradientBoostLoss: Send + Sync + Debug {
    /// Constant prediction the ensemble starts from, computed over in-sample rows.
    fn initial_loss(&self, targets: &[f64], in_sample: &[bool]) -> f64;

    /// Root statistics of the residuals over the in-sample rows.
    fn init_split(&self, targets: &[f64], residuals: &[f64], in_sample: &[bool]) -> GbmSplitInfo;

    /// Negative gradient of the loss at `prediction`.
    fn negative_gradient(&self, target: f64, prediction: f64) -> f64;

    /// Recomputes `residuals` from the current predictions.
    fn update_residuals(
        &self,
        targets: &[f64],
        predictions: &[f64],
        residuals: &mut [f64],
        in_sample: &[bool],
    );

    /// Moves one sample with the given target and residual from `right` to `left`.
    fn update_split_constants(
        &self,
        left: &mut GbmSplitInfo,
        right: &mut GbmSplitInfo,
        target: f64,
        residual: f64,
    );

    /// Whether leaf values must be re-estimated once a split is fixed.
    fn updates_leaf_values(&self) -> bool;

    /// Re-estimated leaf value over the rows flagged in `in_sample`.
    fn updated_leaf_value(
        &self,
        current_leaf_value: f64,
        targets: &[f64],
        predictions: &[f64],
        in_sample: &[bool],
    ) -> f64;
}

fn squared_deviation_cost(info: &GbmSplitInfo) -> f64 {
    info.sum_of_squares - info.sum * info.sum / info.samples as f64
}

fn residual_statistics(residuals: &[f64], in_sample: &[bool]) -> GbmSplitInfo {
    let mut info = GbmSplitInfo::new_empty();
    for (&residual, _) in residuals.iter().zip(in_sample).filter(|(_, flag)| **flag) {
        info.samples += 1;
        info.sum += residual;
        info.sum_of_squares += residual * residual;
    }
    info.cost = squared_deviation_cost(&info);
    info
}

fn move_residual(left: &mut GbmSplitInfo, right: &mut GbmSplitInfo, residual: f64) {
    let residual2 = residual * residual;

    left.samples += 1;
    left.sum += residual;
    left.sum_of_squares += residual2;
    left.cost = squared_deviation_cost(left);

    right.samples -= 1;
    right.sum -= residual;
    right.sum_of_squares -= residual2;
    right.cost = squared_deviation_cost(right);
}

/// Maps NaN to 0 and infinities to the largest finite values.
fn nan_to_num(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else if value.is_infinite() {
        value.signum() * f64::MAX
    } else {
        value
    }
}

fn in_sample_values(values: impl Iterator<Item = f64>, in_sample: &[bool]) -> Vec<f64> {
    values
        .zip(in_sample)
        .filter(|(_, flag)| **flag)
        .map(|(value, _)| value)
        .collect()
}

/// Least squares loss. Starts from the mean and fits plain residuals `y - ŷ`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SquaredLoss;

impl GradientBoostLoss for SquaredLoss {
    fn initial_loss(&self, targets: &[f64], in_sample: &[bool]) -> f64 {
        let values = in_sample_values(targets.iter().copied(), in_sample);
        values.iter().sum::<f64>() / values.len() as f64
    }

    fn init_split(&self, _targets: &[f64], residuals: &[f64], in_sample: &[bool]) -> GbmSplitInfo {
        let mut info = residual_statistics(residuals, in_sample);
        info.best_constant = info.sum / info.samples as f64;
        info
    }

    fn negative_gradient(&self, target: f64, prediction: f64) -> f64 {
        target - prediction
    }

    fn update_residuals(
        &self,
        targets: &[f64],
        predictions: &[f64],
        residuals: &mut [f64],
        in_sample: &[bool],
    ) {
        for (i, residual) in residuals.iter_mut().enumerate() {
            if in_sample[i] {
                *residual = self.negative_gradient(targets[i], predictions[i]);
            }
        }
    }

    fn update_split_constants(
        &self,
        left: &mut GbmSplitInfo,
        right: &mut GbmSplitInfo,
        _target: f64,
        residual: f64,
    ) {
        move_residual(left, right, residual);
        left.best_constant = left.sum / left.samples as f64;
        right.best_constant = right.sum / right.samples as f64;
    }

    fn updates_leaf_values(&self) -> bool {
        false
    }

    fn updated_leaf_value(
        &self,
        current_leaf_value: f64,
        _targets: &[f64],
        _predictions: &[f64],
        _in_sample: &[bool],
    ) -> f64 {
        current_leaf_value
    }
}

/// Least absolute deviation loss.
///
/// Starts from the median and fits the sign of the residual. Splits are still chosen
/// on squared deviations of those signs, and each leaf value is then replaced by the
/// median of `y - ŷ` over the rows that reach it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbsoluteLoss;

impl GradientBoostLoss for AbsoluteLoss {
    fn initial_loss(&self, targets: &[f64], in_sample: &[bool]) -> f64 {
        let values = in_sample_values(targets.iter().copied(), in_sample);
        median(&ArrayView1::from(&values[..]))
    }

    fn init_split(&self, _targets: &[f64], residuals: &[f64], in_sample: &[bool]) -> GbmSplitInfo {
        residual_statistics(residuals, in_sample)
    }

    fn negative_gradient(&self, target: f64, prediction: f64) -> f64 {
        if target - prediction > 0.0 { 1.0 } else { -1.0 }
    }

    fn update_residuals(
        &self,
        targets: &[f64],
        predictions: &[f64],
        residuals: &mut [f64],
        _in_sample: &[bool],
    ) {
        for (i, residual) in residuals.iter_mut().enumerate() {
            *residual = self.negative_gradient(targets[i], predictions[i]);
        }
    }

    fn update_split_constants(
        &self,
        left: &mut GbmSplitInfo,
        right: &mut GbmSplitInfo,
        _target: f64,
        residual: f64,
    ) {
        move_residual(left, right, residual);
    }

    fn updates_leaf_values(&self) -> bool {
        true
    }

    fn updated_leaf_value(
        &self,
        _current_leaf_value: f64,
        targets: &[f64],
        predictions: &[f64],
        in_sample: &[bool],
    ) -> f64 {
        let differences = in_sample_values(
            targets.iter().zip(predictions).map(|(&y, &p)| y - p),
            in_sample,
        );
        median(&ArrayView1::from(&differences[..]))
    }
}

/// Binomial deviance for binary targets coded as 0 and 1.
///
/// Predictions are log-odds. The ensemble starts from the log-odds of the positive
/// class, residuals are `y - σ(ŷ)`, and leaf values take a single Newton step
/// `Σr / Σ(y - r)(1 - y + r)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinomialLoss;

impl BinomialLoss {
    fn best_constant(sum: f64, binomial_sum: f64) -> f64 {
        if binomial_sum != 0.0 {
            sum / binomial_sum
        } else {
            0.0
        }
    }

    fn binomial(target: f64, residual: f64) -> f64 {
        (target - residual) * (1.0 - target + residual)
    }
}

impl GradientBoostLoss for BinomialLoss {
    fn initial_loss(&self, targets: &[f64], in_sample: &[bool]) -> f64 {
        let values = in_sample_values(targets.iter().copied(), in_sample);
        let positives: f64 = values.iter().sum();
        nan_to_num((positives / (values.len() as f64 - positives)).ln())
    }

    fn init_split(&self, targets: &[f64], residuals: &[f64], in_sample: &[bool]) -> GbmSplitInfo {
        let mut info = residual_statistics(residuals, in_sample);
        info.binomial_sum = targets
            .iter()
            .zip(residuals)
            .zip(in_sample)
            .filter(|(_, flag)| **flag)
            .map(|((&target, &residual), _)| BinomialLoss::binomial(target, residual))
            .sum();
        info.best_constant = BinomialLoss::best_constant(info.sum, info.binomial_sum);
        info
    }

    fn negative_gradient(&self, target: f64, prediction: f64) -> f64 {
        nan_to_num(target - sigmoid(prediction))
    }

    fn update_residuals(
        &self,
        targets: &[f64],
        predictions: &[f64],
        residuals: &mut [f64],
        _in_sample: &[bool],
    ) {
        for (i, residual) in residuals.iter_mut().enumerate() {
            *residual = self.negative_gradient(targets[i], predictions[i]);
        }
    }

    fn update_split_constants(
        &self,
        left: &mut GbmSplitInfo,
        right: &mut GbmSplitInfo,
        target: f64,
        residual: f64,
    ) {
        let binomial = BinomialLoss::binomial(target, residual);
        move_residual(left, right, residual);

        left.binomial_sum += binomial;
        left.best_constant = BinomialLoss::best_constant(left.sum, left.binomial_sum);

        right.binomial_sum -= binomial;
        right.best_constant = BinomialLoss::best_constant(right.sum, right.binomial_sum);
    }

    fn updates_leaf_values(&self) -> bool {
        false
    }

    fn updated_leaf_value(
        &self,
        current_leaf_value: f64,
        _targets: &[f64],
        _predictions: &[f64],
        _in_sample: &[bool],
    ) -> f64 {
        current_leaf_value
    }
}
