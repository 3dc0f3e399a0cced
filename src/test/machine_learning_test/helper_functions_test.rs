use super::*;

#[test]
fn test_preliminary_check() {
    let x = array![[1.0, 2.0], [3.0, 4.0]];
    let y = array![0.0, 1.0];
    assert!(preliminary_check(&x, Some(&y)).is_ok());
    assert!(preliminary_check(&x, None::<&Array1<f64>>).is_ok());

    let short = array![0.0];
    assert!(matches!(
        preliminary_check(&x, Some(&short)),
        Err(ModelError::InputValidationError(_))
    ));

    let with_nan = array![[1.0, f64::NAN]];
    assert!(preliminary_check(&with_nan, None::<&Array1<f64>>).is_err());

    let y_inf = array![0.0, f64::INFINITY];
    assert!(preliminary_check(&x, Some(&y_inf)).is_err());

    let empty = Array2::<f64>::zeros((0, 2));
    assert!(preliminary_check(&empty, None::<&Array1<f64>>).is_err());
    let no_features = Array2::<f64>::zeros((3, 0));
    assert!(preliminary_check(&no_features, None::<&Array1<f64>>).is_err());
}

#[test]
fn test_validate_indices_and_weights() {
    assert!(validate_indices(&[0, 2, 2], 3).is_ok());
    assert!(validate_indices(&[], 3).is_ok());
    assert!(matches!(
        validate_indices(&[3], 3),
        Err(ModelError::InputValidationError(_))
    ));

    assert!(validate_weights(&[], 4).is_ok());
    assert!(validate_weights(&[1.0, 0.0, 2.5], 3).is_ok());
    assert!(validate_weights(&[1.0, 1.0], 3).is_err());
    assert!(validate_weights(&[1.0, -0.5, 1.0], 3).is_err());
    assert!(validate_weights(&[1.0, f64::NAN, 1.0], 3).is_err());
}

#[test]
fn test_configuration_validators() {
    assert!(validate_maximum_tree_depth(1).is_ok());
    assert!(matches!(
        validate_maximum_tree_depth(0),
        Err(ModelError::ConfigurationError(_))
    ));

    assert!(validate_minimum_split_size(1).is_ok());
    assert!(validate_minimum_split_size(0).is_err());

    assert!(validate_minimum_information_gain(1e-6).is_ok());
    assert!(validate_minimum_information_gain(0.0).is_err());
    assert!(validate_minimum_information_gain(f64::INFINITY).is_err());

    assert!(validate_number_of_threads(1).is_ok());
    assert!(validate_number_of_threads(0).is_err());

    assert!(validate_learning_rate(0.1).is_ok());
    assert!(validate_learning_rate(-0.1).is_err());
    assert!(validate_learning_rate(f64::NAN).is_err());

    assert!(validate_iterations(1).is_ok());
    assert!(validate_iterations(0).is_err());

    assert!(validate_sub_sample_ratio(1.0).is_ok());
    assert!(validate_sub_sample_ratio(0.5).is_ok());
    assert!(validate_sub_sample_ratio(0.0).is_err());
    assert!(validate_sub_sample_ratio(1.5).is_err());
}

#[test]
fn test_validate_features_pr_split() {
    assert!(validate_features_pr_split(0, 3, true).is_ok());
    assert!(validate_features_pr_split(0, 3, false).is_err());
    assert!(validate_features_pr_split(3, 3, false).is_ok());
    assert!(matches!(
        validate_features_pr_split(4, 3, true),
        Err(ModelError::ConfigurationError(_))
    ));
}

#[test]
fn test_create_ordered_elements_is_stable() {
    let x = array![[2.0, 5.0], [1.0, 5.0], [2.0, 4.0], [0.0, 5.0]];
    let ordered = create_ordered_elements(x.view());
    assert_eq!(ordered.dim(), (2, 4));
    assert_eq!(ordered.row(0).to_vec(), vec![3, 1, 0, 2]);
    assert_eq!(ordered.row(1).to_vec(), vec![2, 0, 1, 3]);
}

#[test]
fn test_distinct_targets() {
    assert_eq!(
        distinct_targets(vec![1.0, 1.0, 0.0, 3.0, 0.0]),
        vec![0.0, 1.0, 3.0]
    );
    assert!(distinct_targets(Vec::new()).is_empty());
    assert!(default_number_of_threads() >= 1);
}
