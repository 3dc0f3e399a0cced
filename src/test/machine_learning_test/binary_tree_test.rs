use super::*;
use ahash::AHashMap;
use approx::assert_abs_diff_eq;

// x[0] <= 2.5 -> leaf 10, otherwise x[1] <= 0.5 -> leaf 20 / leaf 30
fn regression_tree() -> BinaryTree {
    let mut root = Node::new_internal(0, 2.5, 4.0, 0, 6);
    root.left = Some(1);
    root.right = Some(2);
    let mut right = Node::new_internal(1, 0.5, 1.0, 1, 4);
    right.left = Some(3);
    right.right = Some(4);

    let nodes = vec![
        root,
        Node::new_leaf(10.0, None, 1, 2),
        right,
        Node::new_leaf(20.0, None, 2, 2),
        Node::new_leaf(30.0, None, 2, 2),
    ];
    BinaryTree::new(nodes, Vec::new(), vec![3.0, 1.5]).unwrap()
}

fn classification_tree() -> BinaryTree {
    let mut root = Node::new_internal(0, 0.0, 0.5, 0, 4);
    root.left = Some(1);
    root.right = Some(2);
    let nodes = vec![
        root,
        Node::new_leaf(0.0, Some(vec![0.75, 0.25]), 1, 2),
        Node::new_leaf(1.0, Some(vec![0.25, 0.75]), 1, 2),
    ];
    BinaryTree::new(nodes, vec![0.0, 1.0], vec![0.5]).unwrap()
}

#[test]
fn test_predict_one_goes_left_on_equal() {
    let tree = regression_tree();
    assert_eq!(tree.predict_one(&[2.5, 9.0]).unwrap(), 10.0);
    assert_eq!(tree.predict_one(&[2.6, 0.5]).unwrap(), 20.0);
    assert_eq!(tree.predict_one(&[3.0, 0.6]).unwrap(), 30.0);
}

#[test]
fn test_predict_batch_and_indexed() {
    let tree = regression_tree();
    let x = array![[1.0, 0.0], [3.0, 0.0], [3.0, 1.0]];

    let predictions = tree.predict(x.view()).unwrap();
    assert_eq!(predictions, array![10.0, 20.0, 30.0]);

    let indexed = tree.predict_indexed(x.view(), &[2, 0, 2]).unwrap();
    assert_eq!(indexed, array![30.0, 10.0, 30.0]);
}

#[test]
fn test_predict_validates_input() {
    let tree = regression_tree();
    assert!(matches!(
        tree.predict_one(&[1.0]),
        Err(ModelError::TreeError(_))
    ));

    let x = array![[1.0, 0.0, 5.0]];
    assert!(tree.predict(x.view()).is_err());

    let x = array![[1.0, 0.0]];
    assert!(matches!(
        tree.predict_indexed(x.view(), &[1]),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_tree_shape() {
    let tree = regression_tree();
    assert_eq!(tree.nodes().len(), 5);
    assert_eq!(tree.depth(), 2);
    assert_eq!(tree.leaf_count(), 3);
    assert_eq!(tree.feature_count(), 2);
    assert!(!tree.is_classification());
    assert_eq!(tree.raw_variable_importance(), &[3.0, 1.5]);
}

#[test]
fn test_predict_proba() {
    let tree = classification_tree();
    assert!(tree.is_classification());
    assert_eq!(tree.predict_proba_one(&[-1.0]).unwrap(), vec![0.75, 0.25]);

    let x = array![[-1.0], [1.0]];
    let probabilities = tree.predict_proba(x.view()).unwrap();
    assert_eq!(probabilities, array![[0.75, 0.25], [0.25, 0.75]]);

    let indexed = tree.predict_proba_indexed(x.view(), &[1]).unwrap();
    assert_eq!(indexed, array![[0.25, 0.75]]);

    assert!(matches!(
        regression_tree().predict_proba_one(&[0.0, 0.0]),
        Err(ModelError::TreeError(_))
    ));
}

#[test]
fn test_new_rejects_malformed_trees() {
    assert!(BinaryTree::new(Vec::new(), Vec::new(), vec![0.0]).is_err());

    // Internal node without children
    let nodes = vec![Node::new_internal(0, 1.0, 1.0, 0, 2)];
    assert!(matches!(
        BinaryTree::new(nodes, Vec::new(), vec![0.0]),
        Err(ModelError::TreeError(_))
    ));

    // Child pointing backwards
    let mut root = Node::new_internal(0, 1.0, 1.0, 0, 2);
    root.left = Some(0);
    root.right = Some(1);
    let nodes = vec![root, Node::new_leaf(1.0, None, 1, 1)];
    assert!(BinaryTree::new(nodes, Vec::new(), vec![0.0]).is_err());

    // Leaf with a child
    let mut leaf = Node::new_leaf(1.0, None, 0, 1);
    leaf.left = Some(1);
    let nodes = vec![leaf, Node::new_leaf(2.0, None, 1, 1)];
    assert!(BinaryTree::new(nodes, Vec::new(), vec![0.0]).is_err());

    // Split feature beyond the feature count
    let mut root = Node::new_internal(3, 1.0, 1.0, 0, 2);
    root.left = Some(1);
    root.right = Some(2);
    let nodes = vec![
        root,
        Node::new_leaf(1.0, None, 1, 1),
        Node::new_leaf(2.0, None, 1, 1),
    ];
    assert!(BinaryTree::new(nodes, Vec::new(), vec![0.0]).is_err());
}

#[test]
fn test_variable_importance_scaling() {
    let tree = regression_tree();
    let mut names = AHashMap::new();
    names.insert("first".to_string(), 0);
    names.insert("second".to_string(), 1);

    let importance = tree.variable_importance(&names).unwrap();
    assert_eq!(importance[0].0, "first");
    assert_abs_diff_eq!(importance[0].1, 100.0);
    assert_eq!(importance[1].0, "second");
    assert_abs_diff_eq!(importance[1].1, 50.0);

    names.insert("missing".to_string(), 7);
    assert!(matches!(
        tree.variable_importance(&names),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_variable_importance_all_zero() {
    let nodes = vec![Node::new_leaf(1.0, None, 0, 3)];
    let tree = BinaryTree::new(nodes, Vec::new(), vec![0.0, 0.0]).unwrap();
    let mut names = AHashMap::new();
    names.insert("b".to_string(), 1);
    names.insert("a".to_string(), 0);

    let importance = tree.variable_importance(&names).unwrap();
    assert_eq!(
        importance,
        vec![("a".to_string(), 0.0), ("b".to_string(), 0.0)]
    );
}

#[test]
fn test_generate_tree_structure() {
    let structure = regression_tree().generate_tree_structure();
    assert!(structure.starts_with("Decision Tree Structure:"));
    assert!(structure.contains("Split: feature[0] <= 2.5000"));
    assert!(structure.contains("Leaf: value=30.0000"));
}

#[test]
fn test_serde_round_trip() {
    let tree = classification_tree();
    let json = serde_json::to_string(&tree).unwrap();
    let restored: BinaryTree = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, tree);
    assert_eq!(restored.predict_one(&[2.0]).unwrap(), 1.0);
}
