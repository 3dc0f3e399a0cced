use super::*;
use approx::assert_abs_diff_eq;

#[test]
fn test_squared_loss_initial_and_split() {
    let loss = SquaredLoss;
    let targets = [1.0, 2.0, 3.0, 10.0];
    let in_sample = [true, true, true, false];
    assert_abs_diff_eq!(loss.initial_loss(&targets, &in_sample), 2.0);

    let residuals = [1.0, -1.0, 2.0, 5.0];
    let info = loss.init_split(&targets, &residuals, &in_sample);
    assert_eq!(info.samples, 3);
    assert_abs_diff_eq!(info.sum, 2.0);
    assert_abs_diff_eq!(info.sum_of_squares, 6.0);
    assert_abs_diff_eq!(info.cost, 6.0 - 4.0 / 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(info.best_constant, 2.0 / 3.0, epsilon = 1e-12);
    assert_eq!(info.position, NodePosition::Root);
}

#[test]
fn test_squared_loss_moves_samples_left() {
    let loss = SquaredLoss;
    let targets = [0.0; 3];
    let residuals = [1.0, -1.0, 2.0];
    let in_sample = [true; 3];

    let mut left = GbmSplitInfo::new_empty();
    let mut right = loss
        .init_split(&targets, &residuals, &in_sample)
        .copy(NodePosition::Right);
    loss.update_split_constants(&mut left, &mut right, 0.0, 1.0);

    assert_eq!(left.samples, 1);
    assert_abs_diff_eq!(left.cost, 0.0);
    assert_abs_diff_eq!(left.best_constant, 1.0);
    assert_eq!(right.samples, 2);
    assert_abs_diff_eq!(right.sum, 1.0);
    assert_abs_diff_eq!(right.cost, 4.5, epsilon = 1e-12);
    assert_abs_diff_eq!(right.best_constant, 0.5);
    assert_eq!(right.position, NodePosition::Right);
}

#[test]
fn test_squared_loss_updates_in_sample_residuals_only() {
    let loss = SquaredLoss;
    let mut residuals = [9.0; 4];
    loss.update_residuals(
        &[1.0, 2.0, 3.0, 4.0],
        &[0.0; 4],
        &mut residuals,
        &[true, false, true, false],
    );
    assert_eq!(residuals, [1.0, 9.0, 3.0, 9.0]);
    assert!(!loss.updates_leaf_values());
    assert_eq!(loss.updated_leaf_value(1.5, &[], &[], &[]), 1.5);
}

#[test]
fn test_absolute_loss() {
    let loss = AbsoluteLoss;
    let targets = [1.0, 5.0, 3.0, 100.0];
    assert_abs_diff_eq!(loss.initial_loss(&targets, &[true, true, true, false]), 3.0);

    assert_eq!(loss.negative_gradient(3.0, 1.0), 1.0);
    assert_eq!(loss.negative_gradient(1.0, 3.0), -1.0);
    assert_eq!(loss.negative_gradient(2.0, 2.0), -1.0);

    assert!(loss.updates_leaf_values());
    let predictions = [0.0, 1.0, 1.0, 0.0];
    let leaf = loss.updated_leaf_value(0.0, &targets, &predictions, &[true, true, true, false]);
    // median of [1, 4, 2]
    assert_abs_diff_eq!(leaf, 2.0);
}

#[test]
fn test_binomial_loss() {
    let loss = BinomialLoss;
    let targets = [1.0, 1.0, 1.0, 0.0];
    let in_sample = [true; 4];
    assert_abs_diff_eq!(loss.initial_loss(&targets, &in_sample), 3.0_f64.ln(), epsilon = 1e-12);
    assert_abs_diff_eq!(loss.negative_gradient(1.0, 0.0), 0.5);

    let mut residuals = [0.0; 4];
    loss.update_residuals(&targets, &[0.0; 4], &mut residuals, &in_sample);
    assert_eq!(residuals, [0.5, 0.5, 0.5, -0.5]);

    // (y - r)(1 - y + r) = 0.25 for every sample
    let info = loss.init_split(&targets, &residuals, &in_sample);
    assert_abs_diff_eq!(info.binomial_sum, 1.0);
    assert_abs_diff_eq!(info.best_constant, 1.0);
}

#[test]
fn test_binomial_initial_loss_degenerate() {
    let loss = BinomialLoss;
    // 0 / 0 positives ratio is mapped to 0
    assert_eq!(loss.initial_loss(&[0.0, 1.0], &[false, false]), 0.0);
    // A single class gives a finite, saturated starting value
    assert!(loss.initial_loss(&[1.0, 1.0], &[true, true]).is_finite());
}
