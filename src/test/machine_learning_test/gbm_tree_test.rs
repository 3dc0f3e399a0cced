use super::*;
use ahash::AHashMap;
use approx::assert_abs_diff_eq;

fn node(
    feature_index: Option<usize>,
    split_value: f64,
    constants: (f64, f64),
    errors: (f64, f64),
    children: (Option<usize>, Option<usize>),
    depth: usize,
    sample_count: usize,
) -> GbmNode {
    GbmNode {
        feature_index,
        split_value,
        left_constant: constants.0,
        right_constant: constants.1,
        left_error: errors.0,
        right_error: errors.1,
        left: children.0,
        right: children.1,
        depth,
        sample_count,
    }
}

// root error 10 over 8 rows, x[0] < 1 splits (errors 2, 4), left refined on x[1] < 5
fn two_split_tree() -> GbmTree {
    GbmTree::new(vec![
        node(None, -1.0, (0.5, 0.0), (10.0, 0.0), (None, None), 0, 8),
        node(Some(0), 1.0, (-1.0, 1.0), (2.0, 4.0), (Some(2), None), 1, 8),
        node(Some(1), 5.0, (-2.0, -0.5), (0.5, 0.5), (None, None), 2, 4),
    ])
    .unwrap()
}

#[test]
fn test_root_only_tree_predicts_root_constant() {
    let tree = GbmTree::new(vec![node(
        None,
        -1.0,
        (0.25, 0.0),
        (3.0, 0.0),
        (None, None),
        0,
        5,
    )])
    .unwrap();
    assert_eq!(tree.split_count(), 0);
    assert_eq!(tree.predict_one(&[]).unwrap(), 0.25);
    assert_eq!(tree.raw_variable_importance(2).unwrap(), vec![0.0, 0.0]);
}

#[test]
fn test_predict_walks_strictly_less_than() {
    let tree = two_split_tree();
    assert_eq!(tree.split_count(), 2);
    // equal to the split value goes right
    assert_eq!(tree.predict_one(&[1.0, 0.0]).unwrap(), 1.0);
    assert_eq!(tree.predict_one(&[0.0, 4.0]).unwrap(), -2.0);
    assert_eq!(tree.predict_one(&[0.0, 5.0]).unwrap(), -0.5);

    let x = array![[0.0, 4.0], [2.0, 0.0], [0.0, 6.0]];
    assert_eq!(tree.predict(x.view()).unwrap(), array![-2.0, 1.0, -0.5]);
    assert_eq!(
        tree.predict_indexed(x.view(), &[1, 1]).unwrap(),
        array![1.0, 1.0]
    );
    assert!(tree.predict_indexed(x.view(), &[3]).is_err());
    assert!(matches!(
        tree.predict_one(&[0.0]),
        Err(ModelError::TreeError(_))
    ));
}

#[test]
fn test_importance_uses_squared_reduction() {
    let tree = two_split_tree();
    let importance = tree.raw_variable_importance(2).unwrap();
    // (10 - 6)^2 * 8 / 8 and (6 - 1)^2 * 4 / 8
    assert_abs_diff_eq!(importance[0], 16.0);
    assert_abs_diff_eq!(importance[1], 12.5);

    let mut accumulated = vec![1.0, 1.0];
    tree.add_raw_variable_importances(&mut accumulated).unwrap();
    assert_abs_diff_eq!(accumulated[0], 17.0);

    assert!(matches!(
        tree.raw_variable_importance(1),
        Err(ModelError::InputValidationError(_))
    ));

    let mut names = AHashMap::new();
    names.insert("a".to_string(), 0);
    names.insert("b".to_string(), 1);
    let scaled = tree.variable_importance(&names).unwrap();
    assert_eq!(scaled[0].0, "a");
    assert_abs_diff_eq!(scaled[0].1, 100.0);
    assert_abs_diff_eq!(scaled[1].1, 78.125);
}

#[test]
fn test_new_validates_nodes() {
    assert!(GbmTree::new(Vec::new()).is_err());

    let bad_child = vec![
        node(None, -1.0, (0.0, 0.0), (1.0, 0.0), (None, None), 0, 2),
        node(Some(0), 1.0, (0.0, 0.0), (0.0, 0.0), (Some(1), None), 1, 2),
    ];
    assert!(GbmTree::new(bad_child).is_err());

    let missing_feature = vec![
        node(None, -1.0, (0.0, 0.0), (1.0, 0.0), (None, None), 0, 2),
        node(None, 1.0, (0.0, 0.0), (0.0, 0.0), (None, None), 1, 2),
    ];
    assert!(matches!(
        GbmTree::new(missing_feature),
        Err(ModelError::TreeError(_))
    ));
}

#[test]
fn test_split_converts_to_childless_node() {
    let split = GbmSplit {
        depth: 2,
        feature_index: 1,
        split_index: 3,
        split_value: 0.5,
        left_constant: -1.0,
        right_constant: 2.0,
        left_error: 0.1,
        right_error: 0.2,
        cost: 0.3,
        cost_improvement: 0.7,
        sample_count: 6,
    };
    let converted = split.to_node();
    assert_eq!(converted.feature_index, Some(1));
    assert_eq!(converted.split_value, 0.5);
    assert_eq!(converted.left, None);
    assert_eq!(converted.right, None);
    assert_eq!(converted.sample_count, 6);
}
