use super::*;
use approx::assert_abs_diff_eq;

#[test]
fn test_gini_metric() {
    let targets = [0.0, 0.0, 1.0, 1.0];
    let metric = GiniImpurityMetric;
    assert_abs_diff_eq!(metric.impurity(&targets, Interval::with_length(4)), 0.5);
    // Pure sub-interval
    assert_abs_diff_eq!(metric.impurity(&targets, Interval::new(0, 2)), 0.0);
    assert!(metric.is_classification());
}

#[test]
fn test_entropy_metric() {
    let targets = [0.0, 1.0, 0.0, 1.0, 2.0, 2.0, 2.0, 2.0];
    let metric = EntropyImpurityMetric;
    assert_abs_diff_eq!(metric.impurity(&targets, Interval::new(0, 4)), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(metric.impurity(&targets, Interval::new(4, 8)), 0.0, epsilon = 1e-12);
    assert!(metric.is_classification());
}

#[test]
fn test_variance_metric() {
    let targets = [5.0, 1.0, 3.0, 9.0];
    let metric = VarianceImpurityMetric;
    // Sample variance of [1, 3]
    assert_abs_diff_eq!(metric.impurity(&targets, Interval::new(1, 3)), 2.0, epsilon = 1e-12);
    // Sample variance of [5, 1, 3, 9] = 35 / 3
    assert_abs_diff_eq!(
        metric.impurity(&targets, Interval::with_length(4)),
        35.0 / 3.0,
        epsilon = 1e-12
    );
    // A single value has no spread
    assert_eq!(metric.impurity(&targets, Interval::new(2, 3)), 0.0);
    assert!(!metric.is_classification());
}

#[test]
fn test_metrics_through_trait_object() {
    let targets = [1.0, 1.0, 2.0];
    let metrics: Vec<Box<dyn ImpurityMetric>> = vec![
        Box::new(GiniImpurityMetric),
        Box::new(EntropyImpurityMetric),
        Box::new(VarianceImpurityMetric),
    ];
    for metric in &metrics {
        let impurity = metric.impurity(&targets, Interval::with_length(3));
        assert!(impurity.is_finite());
        assert!(impurity > 0.0);
    }
}
