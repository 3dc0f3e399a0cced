use super::binary_tree::{BinaryTree, Node};
use super::helper_functions::{
    distinct_targets, preliminary_check, validate_features_pr_split, validate_indices,
    validate_maximum_tree_depth, validate_minimum_information_gain, validate_weights,
};
use super::impurity_calculator::{
    GiniClassificationImpurityCalculator, ImpurityCalculator, RegressionImpurityCalculator,
};
use super::interval::Interval;
use super::split_searcher::{LinearSplitSearcher, SplitResult, SplitSearcher};
use crate::ModelError;
use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Which side of its parent a queued node hangs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// A node waiting in the growth queue.
#[derive(Debug, Clone, Copy)]
struct QueuedNode {
    parent: Option<(usize, Side)>,
    interval: Interval,
    depth: usize,
}

/// Decision tree learner driven by an incremental impurity calculator.
///
/// Nodes are grown breadth-first from a FIFO queue, so the node array is ordered by
/// depth and the seeded feature draws are made level by level, left before right.
/// For each node a subset of `features_pr_split` features is drawn with a seeded
/// shuffle (all features when the subset covers
/// every feature, or when it is 0), the node's slice of the working index array is
/// sorted by each of them, and the split searcher slides the calculator's boundary
/// across the slice. Per-sample weights flow through the calculator.
///
/// A node becomes a leaf when its depth (root = 0) reaches `maximum_tree_depth`, when
/// no valid split exists, or when the best improvement does not exceed
/// `minimum_information_gain`. Raw importance accumulates
/// `improvement · node_size / sample_count` per split feature.
///
/// # Fields
///
/// - `maximum_tree_depth` - Depth at which nodes are forced to be leaves
/// - `features_pr_split` - Features considered at each split, 0 means all
/// - `minimum_information_gain` - Improvement a split must exceed
/// - `seed` - Seed of the feature sub-sampling
/// - `searcher` - Split search strategy
/// - `calculator` - Prototype of the impurity calculator, cloned for every tree
///
/// # Example
/// ```rust
/// use rustytrees::machine_learning::*;
/// use ndarray::array;
///
/// let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0], [5.0, 50.0], [6.0, 60.0]];
/// let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
///
/// let learner = DecisionTreeLearner::classification(10, 1, 2, 0.001, 42).unwrap();
/// let tree = learner.learn(x.view(), y.view()).unwrap();
///
/// let predictions = tree.predict(x.view()).unwrap();
/// assert_eq!(predictions, y);
/// ```
#[derive(Debug, Clone)]
pub struct DecisionTreeLearner<S: SplitSearcher, C: ImpurityCalculator> {
    maximum_tree_depth: usize,
    features_pr_split: usize,
    minimum_information_gain: f64,
    seed: u64,
    searcher: S,
    calculator: C,
}

impl DecisionTreeLearner<LinearSplitSearcher, GiniClassificationImpurityCalculator> {
    /// Creates a classification learner using the exhaustive searcher and weighted Gini.
    ///
    /// # Parameters
    ///
    /// - `maximum_tree_depth` - Depth at which nodes are forced to be leaves
    /// - `minimum_split_size` - Smallest number of samples allowed in either child
    /// - `features_pr_split` - Features considered at each split, 0 means all
    /// - `minimum_information_gain` - Improvement a split must exceed
    /// - `seed` - Seed of the feature sub-sampling
    ///
    /// # Returns
    ///
    /// - `Result<Self, ModelError>` - The learner, or a `ConfigurationError`
    pub fn classification(
        maximum_tree_depth: usize,
        minimum_split_size: usize,
        features_pr_split: usize,
        minimum_information_gain: f64,
        seed: u64,
    ) -> Result<Self, ModelError> {
        DecisionTreeLearner::new(
            maximum_tree_depth,
            features_pr_split,
            minimum_information_gain,
            seed,
            LinearSplitSearcher::new(minimum_split_size)?,
            GiniClassificationImpurityCalculator::new(),
        )
    }
}

impl DecisionTreeLearner<LinearSplitSearcher, RegressionImpurityCalculator> {
    /// Creates a regression learner using the exhaustive searcher and weighted variance.
    ///
    /// # Parameters
    ///
    /// - `maximum_tree_depth` - Depth at which nodes are forced to be leaves
    /// - `minimum_split_size` - Smallest number of samples allowed in either child
    /// - `features_pr_split` - Features considered at each split, 0 means all
    /// - `minimum_information_gain` - Improvement a split must exceed
    /// - `seed` - Seed of the feature sub-sampling
    ///
    /// # Returns
    ///
    /// - `Result<Self, ModelError>` - The learner, or a `ConfigurationError`
    pub fn regression(
        maximum_tree_depth: usize,
        minimum_split_size: usize,
        features_pr_split: usize,
        minimum_information_gain: f64,
        seed: u64,
    ) -> Result<Self, ModelError> {
        DecisionTreeLearner::new(
            maximum_tree_depth,
            features_pr_split,
            minimum_information_gain,
            seed,
            LinearSplitSearcher::new(minimum_split_size)?,
            RegressionImpurityCalculator::new(),
        )
    }
}

impl<S: SplitSearcher, C: ImpurityCalculator> DecisionTreeLearner<S, C> {
    /// Creates a learner from an explicit searcher and calculator.
    ///
    /// # Returns
    ///
    /// - `Result<Self, ModelError>` - The learner, or a `ConfigurationError` for a zero depth or a non-positive gain
    pub fn new(
        maximum_tree_depth: usize,
        features_pr_split: usize,
        minimum_information_gain: f64,
        seed: u64,
        searcher: S,
        calculator: C,
    ) -> Result<Self, ModelError> {
        validate_maximum_tree_depth(maximum_tree_depth)?;
        validate_minimum_information_gain(minimum_information_gain)?;

        Ok(DecisionTreeLearner {
            maximum_tree_depth,
            features_pr_split,
            minimum_information_gain,
            seed,
            searcher,
            calculator,
        })
    }

    get_field!(get_maximum_tree_depth, maximum_tree_depth, usize);
    get_field!(get_features_pr_split, features_pr_split, usize);
    get_field!(get_minimum_information_gain, minimum_information_gain, f64);
    get_field!(get_seed, seed, u64);

    pub fn get_searcher(&self) -> &S {
        &self.searcher
    }

    /// Learns a tree from every row of `x` with unit weights.
    pub fn learn(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<BinaryTree, ModelError> {
        let indices: Vec<usize> = (0..x.nrows()).collect();
        self.learn_weighted(x, y, &indices, &[])
    }

    /// Learns a tree from the given rows with unit weights.
    ///
    /// # Parameters
    ///
    /// - `x` - Feature matrix with shape (n_samples, n_features)
    /// - `y` - Targets for every row of `x`
    /// - `indices` - Rows to learn from; repetitions are allowed
    pub fn learn_indexed(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        indices: &[usize],
    ) -> Result<BinaryTree, ModelError> {
        self.learn_weighted(x, y, indices, &[])
    }

    /// Learns a tree from the given rows with per-sample weights.
    ///
    /// # Parameters
    ///
    /// - `x` - Feature matrix with shape (n_samples, n_features)
    /// - `y` - Targets for every row of `x`
    /// - `indices` - Rows to learn from; repetitions are allowed
    /// - `weights` - One non-negative weight per row of `x`, or an empty slice for unit weights
    ///
    /// # Returns
    ///
    /// - `Result<BinaryTree, ModelError>` - The trained tree, or an `InputValidationError` / `ConfigurationError`
    pub fn learn_weighted(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        indices: &[usize],
        weights: &[f64],
    ) -> Result<BinaryTree, ModelError> {
        preliminary_check(&x, Some(&y))?;
        validate_indices(indices, x.nrows())?;
        validate_weights(weights, x.nrows())?;
        if indices.is_empty() {
            return Err(ModelError::InputValidationError(
                "At least one sample index is required".to_string(),
            ));
        }

        let n_features = x.ncols();
        validate_features_pr_split(self.features_pr_split, n_features, true)?;
        let features_pr_split = if self.features_pr_split == 0 {
            n_features
        } else {
            self.features_pr_split
        };

        let total = indices.len();
        let target_names = distinct_targets(indices.iter().map(|&i| y[i]));

        debug!(
            n_samples = total,
            n_features = n_features,
            features_pr_split = features_pr_split,
            maximum_tree_depth = self.maximum_tree_depth,
            minimum_information_gain = self.minimum_information_gain,
            weighted = !weights.is_empty(),
            "fitting decision tree"
        );

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut all_features: Vec<usize> = (0..n_features).collect();

        let mut work_indices = indices.to_vec();
        let mut work_feature = vec![0.0; total];
        let mut work_targets: Vec<f64> = work_indices.iter().map(|&i| y[i]).collect();
        let mut work_weights: Vec<f64> = if weights.is_empty() {
            Vec::new()
        } else {
            work_indices.iter().map(|&i| weights[i]).collect()
        };

        let mut calculator = self.calculator.clone();
        calculator.init(
            &target_names,
            &work_targets,
            &work_weights,
            Interval::with_length(total),
        )?;
        let is_classification = calculator.leaf_probabilities().is_some();

        let mut variable_importance = vec![0.0; n_features];
        let mut nodes: Vec<Node> = Vec::new();
        let mut queue = VecDeque::from([QueuedNode {
            parent: None,
            interval: Interval::with_length(total),
            depth: 0,
        }]);

        while let Some(queued) = queue.pop_front() {
            let interval = queued.interval;

            for position in interval.range() {
                let row = work_indices[position];
                work_targets[position] = y[row];
                if !work_weights.is_empty() {
                    work_weights[position] = weights[row];
                }
            }
            calculator.update_interval(&work_targets, &work_weights, interval)?;
            let parent_impurity = calculator.node_impurity();
            let leaf_value = calculator.leaf_value();
            let leaf_probabilities = calculator.leaf_probabilities();

            let mut best = SplitResult::initial();
            let mut best_feature = 0;
            let mut best_order: Option<Vec<usize>> = None;
            let mut is_leaf = queued.depth >= self.maximum_tree_depth;

            if !is_leaf {
                let features: &[usize] = if features_pr_split == n_features {
                    &all_features
                } else {
                    all_features.shuffle(&mut rng);
                    all_features[..features_pr_split].sort_unstable();
                    &all_features[..features_pr_split]
                };

                for &feature_index in features {
                    work_indices[interval.range()]
                        .sort_by(|&a, &b| x[[a, feature_index]].total_cmp(&x[[b, feature_index]]));
                    for position in interval.range() {
                        let row = work_indices[position];
                        work_feature[position] = x[[row, feature_index]];
                        work_targets[position] = y[row];
                        if !work_weights.is_empty() {
                            work_weights[position] = weights[row];
                        }
                    }

                    let result = self.searcher.find_best_split_incremental(
                        &mut calculator,
                        &work_feature,
                        &work_targets,
                        &work_weights,
                        interval,
                        parent_impurity,
                    )?;

                    if result.split_index.is_some()
                        && result.impurity_improvement > best.impurity_improvement
                    {
                        best = result;
                        best_feature = feature_index;
                        best_order = Some(interval.slice(&work_indices).to_vec());
                    }
                }

                is_leaf = best.split_index.is_none()
                    || best.impurity_improvement <= self.minimum_information_gain;

                if let Some(order) = best_order {
                    work_indices[interval.range()].copy_from_slice(&order);
                }
            }

            let node_index = nodes.len();
            match best.split_index {
                Some(split_index) if !is_leaf => {
                    variable_importance[best_feature] +=
                        best.impurity_improvement * interval.len() as f64 / total as f64;

                    trace!(
                        node = node_index,
                        feature = best_feature,
                        threshold = best.threshold,
                        improvement = best.impurity_improvement,
                        depth = queued.depth,
                        "accepted split"
                    );

                    nodes.push(Node::new_internal(
                        best_feature,
                        best.threshold,
                        best.impurity_improvement,
                        queued.depth,
                        interval.len(),
                    ));

                    let (left, right) = interval.split_at(split_index);
                    queue.push_back(QueuedNode {
                        parent: Some((node_index, Side::Left)),
                        interval: left,
                        depth: queued.depth + 1,
                    });
                    queue.push_back(QueuedNode {
                        parent: Some((node_index, Side::Right)),
                        interval: right,
                        depth: queued.depth + 1,
                    });
                }
                _ => nodes.push(Node::new_leaf(
                    leaf_value,
                    leaf_probabilities,
                    queued.depth,
                    interval.len(),
                )),
            }

            if let Some((parent, side)) = queued.parent {
                match side {
                    Side::Left => nodes[parent].left = Some(node_index),
                    Side::Right => nodes[parent].right = Some(node_index),
                }
            }
        }

        debug!(
            n_nodes = nodes.len(),
            depth = nodes.iter().map(|node| node.depth).max().unwrap_or(0),
            "decision tree built"
        );

        let tree_target_names = if is_classification {
            target_names
        } else {
            Vec::new()
        };
        BinaryTree::new(nodes, tree_target_names, variable_importance)
    }
}
