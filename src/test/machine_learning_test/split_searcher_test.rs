use super::*;
use approx::assert_abs_diff_eq;

fn search_gini<S: SplitSearcher>(
    searcher: &S,
    feature: &[f64],
    targets: &[f64],
) -> FindSplitResult {
    let interval = Interval::with_length(feature.len());
    let metric = GiniImpurityMetric;
    let parent = metric.impurity(targets, interval);
    searcher.find_best_split(
        FindSplitResult::initial(),
        0,
        feature,
        targets,
        &metric,
        interval,
        parent,
    )
}

#[test]
fn test_constructors_reject_zero_split_size() {
    assert!(matches!(
        LinearSplitSearcher::new(0),
        Err(ModelError::ConfigurationError(_))
    ));
    assert!(matches!(
        LinearSplitSearcher::with_target_change_heuristic(0),
        Err(ModelError::ConfigurationError(_))
    ));
    assert!(matches!(
        BinarySplitSearcher::new(0),
        Err(ModelError::ConfigurationError(_))
    ));
}

#[test]
fn test_getters() {
    let searcher = LinearSplitSearcher::new(3).unwrap();
    assert_eq!(searcher.get_minimum_split_size(), 3);
    assert!(!searcher.get_require_target_change());
    assert_eq!(searcher.minimum_split_size(), 3);

    let searcher = LinearSplitSearcher::with_target_change_heuristic(2).unwrap();
    assert!(searcher.get_require_target_change());

    let searcher = BinarySplitSearcher::new(4).unwrap();
    assert_eq!(searcher.get_minimum_split_size(), 4);
}

#[test]
fn test_linear_finds_clean_split() {
    let feature = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let targets = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let result = search_gini(&LinearSplitSearcher::new(1).unwrap(), &feature, &targets);

    assert!(result.new_best_split_found);
    assert_eq!(result.split_index, Some(3));
    assert_eq!(result.best_split, FeatureSplit::new(3.5, 0));
    assert_abs_diff_eq!(result.information_gain, 0.5);
    assert_eq!(result.left_interval_impurity.interval, Interval::new(0, 3));
    assert_eq!(result.right_interval_impurity.interval, Interval::new(3, 6));
    assert_eq!(result.left_interval_impurity.impurity, 0.0);
    assert_eq!(result.right_interval_impurity.impurity, 0.0);
}

#[test]
fn test_linear_never_splits_equal_feature_values() {
    let feature = [1.0, 1.0, 1.0, 2.0, 2.0, 2.0];
    let targets = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
    let result = search_gini(&LinearSplitSearcher::new(1).unwrap(), &feature, &targets);
    assert_eq!(result.split_index, Some(3));
    assert_abs_diff_eq!(result.best_split.threshold, 1.5);

    let constant = [7.0; 6];
    let result = search_gini(&LinearSplitSearcher::new(1).unwrap(), &constant, &targets);
    assert!(!result.new_best_split_found);
    assert_eq!(result.split_index, None);
}

#[test]
fn test_linear_respects_minimum_split_size() {
    let feature = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let targets = [0.0, 1.0, 1.0, 1.0, 1.0, 1.0];

    let result = search_gini(&LinearSplitSearcher::new(1).unwrap(), &feature, &targets);
    assert_eq!(result.split_index, Some(1));

    let result = search_gini(&LinearSplitSearcher::new(2).unwrap(), &feature, &targets);
    assert_eq!(result.split_index, Some(2));
    assert_abs_diff_eq!(result.information_gain, 10.0 / 36.0 - 1.0 / 6.0, epsilon = 1e-12);

    // Nothing fits when each child would need more than half the samples
    let result = search_gini(&LinearSplitSearcher::new(4).unwrap(), &feature, &targets);
    assert_eq!(result.split_index, None);
}

#[test]
fn test_linear_keeps_earlier_split_on_ties() {
    let feature = [1.0, 2.0, 3.0, 4.0];
    let targets = [0.0, 0.0, 1.0, 1.0];
    let interval = Interval::with_length(4);
    let metric = GiniImpurityMetric;
    let parent = metric.impurity(&targets, interval);
    let searcher = LinearSplitSearcher::new(1).unwrap();

    let first = searcher.find_best_split(
        FindSplitResult::initial(),
        0,
        &feature,
        &targets,
        &metric,
        interval,
        parent,
    );
    let second = searcher.find_best_split(first, 1, &feature, &targets, &metric, interval, parent);

    assert!(!second.new_best_split_found);
    assert_eq!(second.best_split.feature_index, 0);
    assert_eq!(second.information_gain, first.information_gain);
}

#[test]
fn test_target_change_heuristic_skips_equal_targets() {
    let feature = [1.0, 2.0, 3.0, 4.0, 5.0];
    let targets = [0.0, 0.0, 0.0, 1.0, 1.0];
    let searcher = LinearSplitSearcher::with_target_change_heuristic(1).unwrap();
    let result = search_gini(&searcher, &feature, &targets);
    assert_eq!(result.split_index, Some(3));
}

#[test]
fn test_linear_on_sub_interval() {
    let feature = [9.0, 1.0, 2.0, 3.0, 4.0, -9.0];
    let targets = [1.0, 0.0, 0.0, 1.0, 1.0, 0.0];
    let interval = Interval::new(1, 5);
    let metric = GiniImpurityMetric;
    let parent = metric.impurity(&targets, interval);
    let searcher = LinearSplitSearcher::new(1).unwrap();

    let result = searcher.find_best_split(
        FindSplitResult::initial(),
        2,
        &feature,
        &targets,
        &metric,
        interval,
        parent,
    );
    assert_eq!(result.split_index, Some(3));
    assert_eq!(result.best_split, FeatureSplit::new(2.5, 2));
    assert_eq!(result.left_interval_impurity.interval, Interval::new(1, 3));
    assert_eq!(result.right_interval_impurity.interval, Interval::new(3, 5));
}

#[test]
fn test_incremental_matches_full_scan_for_gini() {
    let feature = [1.0, 2.0, 2.0, 3.0, 4.0, 5.0, 6.0, 6.0, 7.0];
    let targets = [0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0];
    let interval = Interval::with_length(feature.len());
    let searcher = LinearSplitSearcher::new(1).unwrap();

    let full = search_gini(&searcher, &feature, &targets);

    let mut calculator = GiniClassificationImpurityCalculator::new();
    calculator
        .init(&[0.0, 1.0], &targets, &[], interval)
        .unwrap();
    let parent = calculator.node_impurity();
    let incremental = searcher
        .find_best_split_incremental(&mut calculator, &feature, &targets, &[], interval, parent)
        .unwrap();

    assert_eq!(incremental.split_index, full.split_index);
    assert_abs_diff_eq!(incremental.threshold, full.best_split.threshold);
    assert_abs_diff_eq!(
        incremental.impurity_improvement,
        full.information_gain,
        epsilon = 1e-12
    );
}

#[test]
fn test_incremental_without_candidates() {
    let feature = [3.0, 3.0, 3.0];
    let targets = [1.0, 2.0, 3.0];
    let interval = Interval::with_length(3);
    let mut calculator = RegressionImpurityCalculator::new();
    calculator.init(&[], &targets, &[], interval).unwrap();

    let result = LinearSplitSearcher::new(1)
        .unwrap()
        .find_best_split_incremental(&mut calculator, &feature, &targets, &[], interval, 0.0)
        .unwrap();
    assert_eq!(result, SplitResult::initial());
}

#[test]
fn test_binary_searcher_bisects_candidates() {
    let feature = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
    let targets = [0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
    let result = search_gini(&BinarySplitSearcher::new(1).unwrap(), &feature, &targets);

    assert!(result.new_best_split_found);
    assert_eq!(result.split_index, Some(3));
    assert_abs_diff_eq!(result.best_split.threshold, 3.5);
    assert_abs_diff_eq!(result.information_gain, 0.18666666666666662, epsilon = 1e-12);
}

#[test]
fn test_binary_searcher_needs_two_candidates() {
    // A single candidate boundary is never probed by the bisection
    let feature = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let targets = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let binary = search_gini(&BinarySplitSearcher::new(1).unwrap(), &feature, &targets);
    let linear = search_gini(&LinearSplitSearcher::new(1).unwrap(), &feature, &targets);

    assert_eq!(binary.split_index, None);
    assert_eq!(linear.split_index, Some(3));
}

#[test]
fn test_binary_searcher_incremental() {
    let feature = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
    let targets = [0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
    let interval = Interval::with_length(feature.len());
    let mut calculator = GiniClassificationImpurityCalculator::new();
    calculator
        .init(&[0.0, 1.0], &targets, &[], interval)
        .unwrap();
    let parent = calculator.node_impurity();

    let result = BinarySplitSearcher::new(1)
        .unwrap()
        .find_best_split_incremental(&mut calculator, &feature, &targets, &[], interval, parent)
        .unwrap();
    assert_eq!(result.split_index, Some(3));
    assert_abs_diff_eq!(result.impurity_improvement, 0.18666666666666662, epsilon = 1e-12);
}

#[test]
fn test_feature_split_tolerant_equality() {
    assert_eq!(FeatureSplit::new(1.0, 2), FeatureSplit::new(1.000001, 2));
    assert_ne!(FeatureSplit::new(1.0, 2), FeatureSplit::new(1.1, 2));
    assert_ne!(FeatureSplit::new(1.0, 2), FeatureSplit::new(1.0, 3));
}
