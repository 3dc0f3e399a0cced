use super::binary_tree::{BinaryTree, Node};
use super::helper_functions::{
    distinct_targets, preliminary_check, validate_indices, validate_maximum_tree_depth,
    validate_minimum_information_gain,
};
use super::impurity_metric::{GiniImpurityMetric, ImpurityMetric, VarianceImpurityMetric};
use super::interval::Interval;
use super::split_searcher::{FindSplitResult, LinearSplitSearcher, SplitSearcher};
use crate::ModelError;
use ndarray::{ArrayView1, ArrayView2};
use tracing::{debug, trace};

/// Which side of its parent a pending node hangs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// A node waiting to be processed by the CART builder.
#[derive(Debug, Clone, Copy)]
struct PendingNode {
    parent: Option<(usize, Side)>,
    interval: Interval,
    impurity: f64,
    depth: usize,
}

/// Classification and Regression Tree learner.
///
/// Grows a tree depth-first over a working array of row indices. For every node and
/// every feature, the node's slice of the working array is stable-sorted by that
/// feature and handed to the split searcher together with the running best split, so
/// a later feature only wins with a strictly larger information gain. After the
/// feature loop the slice is restored to the winning feature's order and divided at
/// the split position.
///
/// A node becomes a leaf when its depth (root = 0) reaches `maximum_tree_depth`, when
/// no valid split exists, or when the best gain does not exceed
/// `minimum_information_gain`. Classification leaves predict the majority class
/// (ties go to the smallest class code), regression leaves predict the mean target.
///
/// # Type Parameters
///
/// - `S` - Split search strategy
/// - `M` - Impurity metric; classification metrics produce class-code leaves
///
/// # Example
/// ```rust
/// use rustytrees::machine_learning::*;
/// use ndarray::array;
///
/// let x = array![[1.0, 5.0], [2.0, 4.0], [3.0, 3.0], [4.0, 2.0]];
/// let y = array![1.0, 1.0, 2.0, 2.0];
///
/// let learner = CartLearner::regression(1, 10, 0.001).unwrap();
/// let tree = learner.learn(x.view(), y.view()).unwrap();
///
/// assert_eq!(tree.predict_one(&[1.5, 4.5]).unwrap(), 1.0);
/// assert_eq!(tree.predict_one(&[3.5, 2.5]).unwrap(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct CartLearner<S: SplitSearcher, M: ImpurityMetric> {
    maximum_tree_depth: usize,
    minimum_information_gain: f64,
    searcher: S,
    metric: M,
}

impl CartLearner<LinearSplitSearcher, GiniImpurityMetric> {
    /// Creates a classification learner using the exhaustive searcher and Gini impurity.
    ///
    /// # Parameters
    ///
    /// - `minimum_split_size` - Smallest number of samples allowed in either child
    /// - `maximum_tree_depth` - Depth at which nodes are forced to be leaves
    /// - `minimum_information_gain` - Gain a split must exceed
    ///
    /// # Returns
    ///
    /// - `Result<Self, ModelError>` - The learner, or a `ConfigurationError`
    pub fn classification(
        minimum_split_size: usize,
        maximum_tree_depth: usize,
        minimum_information_gain: f64,
    ) -> Result<Self, ModelError> {
        CartLearner::new(
            maximum_tree_depth,
            minimum_information_gain,
            LinearSplitSearcher::new(minimum_split_size)?,
            GiniImpurityMetric,
        )
    }
}

impl CartLearner<LinearSplitSearcher, VarianceImpurityMetric> {
    /// Creates a regression learner using the exhaustive searcher and sample variance.
    ///
    /// # Parameters
    ///
    /// - `minimum_split_size` - Smallest number of samples allowed in either child
    /// - `maximum_tree_depth` - Depth at which nodes are forced to be leaves
    /// - `minimum_information_gain` - Gain a split must exceed
    ///
    /// # Returns
    ///
    /// - `Result<Self, ModelError>` - The learner, or a `ConfigurationError`
    pub fn regression(
        minimum_split_size: usize,
        maximum_tree_depth: usize,
        minimum_information_gain: f64,
    ) -> Result<Self, ModelError> {
        CartLearner::new(
            maximum_tree_depth,
            minimum_information_gain,
            LinearSplitSearcher::new(minimum_split_size)?,
            VarianceImpurityMetric,
        )
    }
}

impl<S: SplitSearcher, M: ImpurityMetric> CartLearner<S, M> {
    /// Creates a learner from an explicit searcher and metric.
    ///
    /// # Parameters
    ///
    /// - `maximum_tree_depth` - Depth at which nodes are forced to be leaves, must be > 0
    /// - `minimum_information_gain` - Gain a split must exceed, must be > 0
    /// - `searcher` - Split search strategy
    /// - `metric` - Impurity metric
    ///
    /// # Returns
    ///
    /// - `Result<Self, ModelError>` - The learner, or a `ConfigurationError`
    pub fn new(
        maximum_tree_depth: usize,
        minimum_information_gain: f64,
        searcher: S,
        metric: M,
    ) -> Result<Self, ModelError> {
        validate_maximum_tree_depth(maximum_tree_depth)?;
        validate_minimum_information_gain(minimum_information_gain)?;

        Ok(CartLearner {
            maximum_tree_depth,
            minimum_information_gain,
            searcher,
            metric,
        })
    }

    get_field!(get_maximum_tree_depth, maximum_tree_depth, usize);
    get_field!(get_minimum_information_gain, minimum_information_gain, f64);

    pub fn get_searcher(&self) -> &S {
        &self.searcher
    }

    pub fn get_metric(&self) -> &M {
        &self.metric
    }

    /// Learns a tree from every row of `x`.
    ///
    /// # Parameters
    ///
    /// - `x` - Feature matrix with shape (n_samples, n_features)
    /// - `y` - Targets: class codes for classification metrics, values otherwise
    ///
    /// # Returns
    ///
    /// - `Result<BinaryTree, ModelError>` - The trained tree, or an `InputValidationError`
    pub fn learn(&self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<BinaryTree, ModelError> {
        let indices: Vec<usize> = (0..x.nrows()).collect();
        self.learn_indexed(x, y, &indices)
    }

    /// Learns a tree from the given rows only.
    ///
    /// # Parameters
    ///
    /// - `x` - Feature matrix with shape (n_samples, n_features)
    /// - `y` - Targets for every row of `x`
    /// - `indices` - Rows to learn from; repetitions are allowed, which supports bootstrap samples
    ///
    /// # Returns
    ///
    /// - `Result<BinaryTree, ModelError>` - The trained tree, or an `InputValidationError`
    pub fn learn_indexed(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        indices: &[usize],
    ) -> Result<BinaryTree, ModelError> {
        preliminary_check(&x, Some(&y))?;
        validate_indices(indices, x.nrows())?;
        if indices.is_empty() {
            return Err(ModelError::InputValidationError(
                "At least one sample index is required".to_string(),
            ));
        }

        let n_features = x.ncols();
        let total = indices.len();
        let is_classification = self.metric.is_classification();
        let target_names = if is_classification {
            distinct_targets(indices.iter().map(|&i| y[i]))
        } else {
            Vec::new()
        };

        debug!(
            n_samples = total,
            n_features = n_features,
            maximum_tree_depth = self.maximum_tree_depth,
            minimum_information_gain = self.minimum_information_gain,
            classification = is_classification,
            "fitting CART tree"
        );

        let mut work_indices = indices.to_vec();
        let mut work_feature = vec![0.0; total];
        let mut work_targets: Vec<f64> = work_indices.iter().map(|&i| y[i]).collect();

        let root_interval = Interval::with_length(total);
        let root_impurity = self.metric.impurity(&work_targets, root_interval);

        let mut variable_importance = vec![0.0; n_features];
        let mut nodes: Vec<Node> = Vec::new();
        let mut stack = vec![PendingNode {
            parent: None,
            interval: root_interval,
            impurity: root_impurity,
            depth: 0,
        }];

        while let Some(pending) = stack.pop() {
            let interval = pending.interval;
            let mut best = FindSplitResult::initial();
            let mut best_order: Option<Vec<usize>> = None;
            let mut is_leaf = pending.depth >= self.maximum_tree_depth;

            if !is_leaf {
                for feature_index in 0..n_features {
                    work_indices[interval.range()]
                        .sort_by(|&a, &b| x[[a, feature_index]].total_cmp(&x[[b, feature_index]]));
                    for position in interval.range() {
                        let row = work_indices[position];
                        work_feature[position] = x[[row, feature_index]];
                        work_targets[position] = y[row];
                    }

                    let result = self.searcher.find_best_split(
                        best,
                        feature_index,
                        &work_feature,
                        &work_targets,
                        &self.metric,
                        interval,
                        pending.impurity,
                    );

                    if result.new_best_split_found {
                        best = result;
                        best_order = Some(interval.slice(&work_indices).to_vec());
                    }
                }

                is_leaf = best.split_index.is_none()
                    || best.information_gain <= self.minimum_information_gain;

                if let Some(order) = best_order {
                    work_indices[interval.range()].copy_from_slice(&order);
                }
            }

            let node_index = nodes.len();
            match best.split_index {
                Some(split_index) if !is_leaf => {
                    let feature_index = best.best_split.feature_index;
                    variable_importance[feature_index] +=
                        best.information_gain * interval.len() as f64 / total as f64;

                    trace!(
                        node = node_index,
                        feature = feature_index,
                        threshold = best.best_split.threshold,
                        gain = best.information_gain,
                        depth = pending.depth,
                        "accepted split"
                    );

                    nodes.push(Node::new_internal(
                        feature_index,
                        best.best_split.threshold,
                        best.information_gain,
                        pending.depth,
                        interval.len(),
                    ));

                    let (left, right) = interval.split_at(split_index);
                    stack.push(PendingNode {
                        parent: Some((node_index, Side::Right)),
                        interval: right,
                        impurity: best.right_interval_impurity.impurity,
                        depth: pending.depth + 1,
                    });
                    stack.push(PendingNode {
                        parent: Some((node_index, Side::Left)),
                        interval: left,
                        impurity: best.left_interval_impurity.impurity,
                        depth: pending.depth + 1,
                    });
                }
                _ => {
                    let values: Vec<f64> = interval
                        .slice(&work_indices)
                        .iter()
                        .map(|&row| y[row])
                        .collect();
                    let leaf = if is_classification {
                        let (value, probabilities) = classification_leaf(&values, &target_names);
                        Node::new_leaf(value, Some(probabilities), pending.depth, interval.len())
                    } else {
                        Node::new_leaf(regression_leaf(&values), None, pending.depth, interval.len())
                    };
                    nodes.push(leaf);
                }
            }

            if let Some((parent, side)) = pending.parent {
                match side {
                    Side::Left => nodes[parent].left = Some(node_index),
                    Side::Right => nodes[parent].right = Some(node_index),
                }
            }
        }

        debug!(
            n_nodes = nodes.len(),
            depth = nodes.iter().map(|node| node.depth).max().unwrap_or(0),
            "CART tree built"
        );

        BinaryTree::new(nodes, target_names, variable_importance)
    }
}

/// Majority class (ties go to the smallest class code) and Laplace-adjusted probabilities.
fn classification_leaf(values: &[f64], target_names: &[f64]) -> (f64, Vec<f64>) {
    let mut counts = vec![0.0; target_names.len()];
    for value in values {
        if let Ok(position) = target_names.binary_search_by(|probe| probe.total_cmp(value)) {
            counts[position] += 1.0;
        }
    }

    let mut best = 0;
    for (class, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = class;
        }
    }

    let denominator = values.len() as f64 + target_names.len() as f64;
    let probabilities = counts.iter().map(|&c| (c + 1.0) / denominator).collect();

    (target_names.get(best).copied().unwrap_or(0.0), probabilities)
}

fn regression_leaf(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
