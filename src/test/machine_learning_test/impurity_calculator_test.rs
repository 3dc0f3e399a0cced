use super::*;
use approx::assert_abs_diff_eq;

#[test]
fn test_gini_calculator_matches_metric_at_every_boundary() {
    let targets = [0.0, 1.0, 1.0, 0.0, 2.0, 1.0, 0.0, 2.0];
    let names = distinct_targets(targets.iter().copied());
    let interval = Interval::with_length(targets.len());
    let metric = GiniImpurityMetric;

    let mut calculator = GiniClassificationImpurityCalculator::new();
    calculator.init(&names, &targets, &[], interval).unwrap();
    assert_eq!(calculator.node_impurity(), metric.impurity(&targets, interval));

    for position in 1..targets.len() {
        calculator.update_index(&targets, &[], position).unwrap();
        let (left, right) = calculator.child_impurities();
        let (left_interval, right_interval) = interval.split_at(position);
        assert_eq!(left, metric.impurity(&targets, left_interval));
        assert_eq!(right, metric.impurity(&targets, right_interval));
        assert_eq!(calculator.weighted_left(), position as f64);
        assert_eq!(calculator.weighted_right(), (targets.len() - position) as f64);
    }
}

#[test]
fn test_gini_calculator_improvement() {
    let targets = [0.0, 0.0, 1.0, 1.0];
    let mut calculator = GiniClassificationImpurityCalculator::new();
    calculator
        .init(&[0.0, 1.0], &targets, &[], Interval::with_length(4))
        .unwrap();
    let parent = calculator.node_impurity();
    calculator.update_index(&targets, &[], 2).unwrap();
    assert_abs_diff_eq!(calculator.impurity_improvement(parent), 0.5);
}

#[test]
fn test_gini_calculator_leaf() {
    let targets = [2.0, 1.0, 2.0, 1.0, 3.0];
    let mut calculator = GiniClassificationImpurityCalculator::new();
    calculator
        .init(&[1.0, 2.0, 3.0], &targets, &[], Interval::with_length(5))
        .unwrap();

    // Tie between 1 and 2 goes to the smaller class code
    assert_eq!(calculator.leaf_value(), 1.0);

    let probabilities = calculator.leaf_probabilities().unwrap();
    assert_abs_diff_eq!(probabilities[0], 3.0 / 8.0);
    assert_abs_diff_eq!(probabilities[1], 3.0 / 8.0);
    assert_abs_diff_eq!(probabilities[2], 2.0 / 8.0);
    assert_eq!(calculator.target_names(), &[1.0, 2.0, 3.0]);
}

#[test]
fn test_gini_calculator_weights() {
    let targets = [0.0, 1.0, 1.0];
    let weights = [4.0, 1.0, 1.0];
    let mut calculator = GiniClassificationImpurityCalculator::new();
    calculator
        .init(&[0.0, 1.0], &targets, &weights, Interval::with_length(3))
        .unwrap();

    assert_eq!(calculator.leaf_value(), 0.0);
    // 1 - (16 + 4) / 36
    assert_abs_diff_eq!(calculator.node_impurity(), 16.0 / 36.0, epsilon = 1e-12);
}

#[test]
fn test_gini_calculator_unknown_class() {
    let targets = [0.0, 5.0];
    let mut calculator = GiniClassificationImpurityCalculator::new();
    let result = calculator.init(&[0.0, 1.0], &targets, &[], Interval::with_length(2));
    assert!(matches!(result, Err(ModelError::InputValidationError(_))));
}

#[test]
fn test_update_index_rejects_backwards_moves() {
    let targets = [0.0, 1.0, 0.0, 1.0];
    let mut calculator = GiniClassificationImpurityCalculator::new();
    calculator
        .init(&[0.0, 1.0], &targets, &[], Interval::with_length(4))
        .unwrap();
    calculator.update_index(&targets, &[], 3).unwrap();

    let result = calculator.update_index(&targets, &[], 1);
    assert!(matches!(result, Err(ModelError::ProcessingError(_))));

    let result = calculator.update_index(&targets, &[], 5);
    assert!(matches!(result, Err(ModelError::ProcessingError(_))));

    // After a reset the boundary starts over
    calculator.reset();
    assert!(calculator.update_index(&targets, &[], 1).is_ok());
}

#[test]
fn test_regression_calculator_matches_full_scan() {
    let targets = [3.0, 1.5, 4.0, 1.0, 5.5, 9.0, 2.5];
    let interval = Interval::with_length(targets.len());
    let mut calculator = RegressionImpurityCalculator::new();
    calculator.init(&[], &targets, &[], interval).unwrap();

    let full = crate::math::variance(&ArrayView1::from(&targets[..]));
    assert_abs_diff_eq!(calculator.node_impurity(), full, epsilon = 1e-10);

    for position in 1..targets.len() {
        calculator.update_index(&targets, &[], position).unwrap();
        let (left, right) = calculator.child_impurities();
        let (left_interval, right_interval) = interval.split_at(position);
        let full_left = crate::math::variance(&ArrayView1::from(left_interval.slice(&targets)));
        let full_right = crate::math::variance(&ArrayView1::from(right_interval.slice(&targets)));
        assert_abs_diff_eq!(left, full_left, epsilon = 1e-10);
        assert_abs_diff_eq!(right, full_right, epsilon = 1e-10);
    }
}

#[test]
fn test_regression_calculator_improvement_and_leaf() {
    let targets = [1.0, 1.0, 3.0, 3.0];
    let mut calculator = RegressionImpurityCalculator::new();
    calculator
        .init(&[], &targets, &[], Interval::with_length(4))
        .unwrap();
    assert_abs_diff_eq!(calculator.leaf_value(), 2.0);
    assert!(calculator.leaf_probabilities().is_none());
    assert!(calculator.target_names().is_empty());

    calculator.update_index(&targets, &[], 2).unwrap();
    // wL * wR * (meanL - meanR)^2 / (wL + wR) = 2 * 2 * 4 / 4
    assert_abs_diff_eq!(calculator.impurity_improvement(0.0), 4.0);
}

#[test]
fn test_regression_calculator_sub_interval() {
    let targets = [100.0, 2.0, 4.0, -100.0];
    let mut calculator = RegressionImpurityCalculator::new();
    calculator
        .init(&[], &targets, &[], Interval::new(1, 3))
        .unwrap();
    assert_abs_diff_eq!(calculator.leaf_value(), 3.0);
    assert_abs_diff_eq!(calculator.node_impurity(), 1.0, epsilon = 1e-12);
}
