use super::*;
use crate::machine_learning::gbm_tree_learner::partition;

fn split_at(feature_index: usize, split_index: usize) -> GbmSplit {
    GbmSplit {
        depth: 1,
        feature_index,
        split_index,
        split_value: 0.0,
        left_constant: 0.0,
        right_constant: 0.0,
        left_error: 0.0,
        right_error: 0.0,
        cost: 0.0,
        cost_improvement: 0.0,
        sample_count: 0,
    }
}

fn assert_partitions(parent: &[bool], left: &[bool], right: &[bool]) {
    assert_eq!(left.len(), parent.len());
    assert_eq!(right.len(), parent.len());
    for row in 0..parent.len() {
        assert!(!(left[row] && right[row]), "row {} is on both sides", row);
        assert_eq!(left[row] || right[row], parent[row], "row {}", row);
    }
}

#[test]
fn test_partition_splits_by_sorted_position() {
    let x = array![[3.0, 0.0], [1.0, 1.0], [4.0, 0.0], [2.0, 1.0], [5.0, 0.0]];
    let ordered = create_ordered_elements(x.view());
    assert_eq!(ordered.row(0).to_vec(), vec![1, 3, 0, 2, 4]);

    let parent = [true, true, false, true, true];
    let (left, right) = partition(&ordered, &split_at(0, 2), &parent);

    assert_eq!(left, vec![false, true, false, true, false]);
    assert_eq!(right, vec![true, false, false, false, true]);
    assert_partitions(&parent, &left, &right);
}

#[test]
fn test_partition_is_disjoint_and_complete_at_every_position() {
    let x = array![
        [0.5, 2.0],
        [0.1, 2.0],
        [0.9, 1.0],
        [0.3, 3.0],
        [0.7, 1.0],
        [0.2, 3.0],
    ];
    let ordered = create_ordered_elements(x.view());
    let parents = [
        vec![true; 6],
        vec![false, true, true, false, true, false],
        vec![true, false, false, false, false, true],
    ];

    for parent in &parents {
        for feature_index in 0..2 {
            for split_index in 0..=6 {
                let split = split_at(feature_index, split_index);
                let (left, right) = partition(&ordered, &split, parent);
                assert_partitions(parent, &left, &right);
            }
        }
    }
}

#[test]
fn test_learned_splits_respect_the_in_sample_mask() {
    let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
    let targets = [0.0, 0.0, 100.0, 10.0, 10.0, 10.0];
    let predictions = [0.0; 6];
    let in_sample = [true, true, false, true, true, true];

    let learner = GbmDecisionTreeLearner::builder()
        .with_maximum_tree_depth(1)
        .with_loss(std::sync::Arc::new(SquaredLoss))
        .with_number_of_threads(1)
        .build()
        .unwrap();
    let ordered = create_ordered_elements(x.view());
    let tree = learner
        .learn(x.view(), &targets, &targets, &predictions, &ordered, &in_sample)
        .unwrap();

    // row 2 is out of sample, so the boundary sits between x = 2 and x = 4
    let nodes = tree.nodes();
    assert_eq!(nodes[0].sample_count, 5);
    assert_eq!(nodes[1].feature_index, Some(0));
    assert_eq!(nodes[1].split_value, 3.0);
    assert_eq!(nodes[1].left_constant, 0.0);
    assert_eq!(nodes[1].right_constant, 10.0);

    let (left, right) = partition(&ordered, &split_at(0, 3), &in_sample);
    assert_partitions(&in_sample, &left, &right);
    assert_eq!(left.iter().filter(|&&flag| flag).count(), 2);
    assert_eq!(right.iter().filter(|&&flag| flag).count(), 3);
}
