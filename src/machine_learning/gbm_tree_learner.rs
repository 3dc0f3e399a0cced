use super::gbm_loss::GradientBoostLoss;
use super::gbm_split::{GbmSplit, GbmSplitInfo, GbmSplitResult, NodePosition};
use super::gbm_tree::{GbmNode, GbmTree};
use super::helper_functions::{
    default_number_of_threads, preliminary_check, validate_features_pr_split,
    validate_maximum_tree_depth, validate_minimum_information_gain, validate_minimum_split_size,
    validate_number_of_threads,
};
use crate::ModelError;
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace};

/// Seed of the per-split feature shuffle.
const FEATURE_SHUFFLE_SEED: u64 = 234;

/// A node waiting for its split search.
#[derive(Debug, Clone)]
struct WorkItem {
    parent: usize,
    values: GbmSplitInfo,
    in_sample: Vec<bool>,
    depth: usize,
}

/// Read-only inputs shared by every split search of one build.
#[derive(Clone, Copy)]
struct SearchContext<'a> {
    x: ArrayView2<'a, f64>,
    targets: &'a [f64],
    residuals: &'a [f64],
    ordered_elements: &'a Array2<usize>,
}

/// Builder for [`GbmDecisionTreeLearner`].
///
/// Defaults: depth 3, minimum split size 1, minimum information gain `1e-6`, all
/// features per split and one thread per available core. A loss must be supplied.
#[derive(Debug, Clone)]
pub struct GbmDecisionTreeLearnerBuilder {
    maximum_tree_depth: usize,
    minimum_split_size: usize,
    minimum_information_gain: f64,
    features_pr_split: usize,
    loss: Option<Arc<dyn GradientBoostLoss>>,
    number_of_threads: usize,
}

impl Default for GbmDecisionTreeLearnerBuilder {
    fn default() -> Self {
        GbmDecisionTreeLearnerBuilder {
            maximum_tree_depth: 3,
            minimum_split_size: 1,
            minimum_information_gain: 1e-6,
            features_pr_split: 0,
            loss: None,
            number_of_threads: default_number_of_threads(),
        }
    }
}

impl GbmDecisionTreeLearnerBuilder {
    /// Depth at which split nodes stop getting children, must be > 0.
    pub fn with_maximum_tree_depth(mut self, maximum_tree_depth: usize) -> Self {
        self.maximum_tree_depth = maximum_tree_depth;
        self
    }

    /// Smallest number of in-sample rows on either side of a split, must be > 0.
    pub fn with_minimum_split_size(mut self, minimum_split_size: usize) -> Self {
        self.minimum_split_size = minimum_split_size;
        self
    }

    /// Cost improvement a split must exceed to get children, must be > 0.
    pub fn with_minimum_information_gain(mut self, minimum_information_gain: f64) -> Self {
        self.minimum_information_gain = minimum_information_gain;
        self
    }

    /// Features drawn per split. 0 uses every feature.
    pub fn with_features_pr_split(mut self, features_pr_split: usize) -> Self {
        self.features_pr_split = features_pr_split;
        self
    }

    /// Loss whose residual statistics drive the split search.
    pub fn with_loss(mut self, loss: Arc<dyn GradientBoostLoss>) -> Self {
        self.loss = Some(loss);
        self
    }

    /// Worker threads for the per-feature split search, must be >= 1.
    pub fn with_number_of_threads(mut self, number_of_threads: usize) -> Self {
        self.number_of_threads = number_of_threads;
        self
    }

    /// Validates the settings and creates the learner.
    ///
    /// # Returns
    ///
    /// - `Ok(GbmDecisionTreeLearner)` - The learner, owning a thread pool when more than one thread is requested
    /// - `Err(ModelError::ConfigurationError)` - If a setting is invalid or no loss was given
    /// - `Err(ModelError::ProcessingError)` - If the thread pool cannot be created
    pub fn build(self) -> Result<GbmDecisionTreeLearner, ModelError> {
        validate_maximum_tree_depth(self.maximum_tree_depth)?;
        validate_minimum_split_size(self.minimum_split_size)?;
        validate_minimum_information_gain(self.minimum_information_gain)?;
        validate_number_of_threads(self.number_of_threads)?;
        let loss = self.loss.ok_or_else(|| {
            ModelError::ConfigurationError("a loss function is required".to_string())
        })?;

        let pool = if self.number_of_threads > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.number_of_threads)
                .build()
                .map_err(|e| ModelError::ProcessingError(e.to_string()))?;
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(GbmDecisionTreeLearner {
            maximum_tree_depth: self.maximum_tree_depth,
            minimum_split_size: self.minimum_split_size,
            minimum_information_gain: self.minimum_information_gain,
            features_pr_split: self.features_pr_split,
            number_of_threads: self.number_of_threads,
            loss,
            pool,
        })
    }
}

/// Regression tree builder used by gradient boosting.
///
/// Fits the residuals of the current ensemble. Nodes are grown breadth-first from a
/// queue. For every node, each feature's presorted row order is scanned once over the
/// node's in-sample rows while the loss moves samples from the right statistics to
/// the left statistics, and the cheapest split with at least `minimum_split_size` rows
/// per side is kept. Features are searched in parallel inside the learner's own
/// thread pool. Their results are collected in feature order and the first minimum
/// cost wins, so the tree does not depend on the thread count.
///
/// Every node that found a split is recorded together with its two side constants.
/// It only gets children while its depth is below `maximum_tree_depth` and its cost
/// improvement exceeds `minimum_information_gain`.
///
/// # Example
/// ```rust
/// use rustytrees::machine_learning::*;
/// use ndarray::array;
/// use std::sync::Arc;
///
/// let x = array![[1.0], [2.0], [3.0], [4.0]];
/// let targets = [1.0, 1.0, 3.0, 3.0];
/// let predictions = [2.0; 4];
/// let residuals: Vec<f64> = targets.iter().map(|t| t - 2.0).collect();
///
/// let learner = GbmDecisionTreeLearner::builder()
///     .with_maximum_tree_depth(1)
///     .with_loss(Arc::new(SquaredLoss))
///     .with_number_of_threads(1)
///     .build()
///     .unwrap();
///
/// let ordered = create_ordered_elements(x.view());
/// let tree = learner
///     .learn(x.view(), &targets, &residuals, &predictions, &ordered, &[true; 4])
///     .unwrap();
/// assert_eq!(tree.predict_one(&[1.0]).unwrap(), -1.0);
/// assert_eq!(tree.predict_one(&[4.0]).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct GbmDecisionTreeLearner {
    maximum_tree_depth: usize,
    minimum_split_size: usize,
    minimum_information_gain: f64,
    features_pr_split: usize,
    number_of_threads: usize,
    loss: Arc<dyn GradientBoostLoss>,
    pool: Option<Arc<ThreadPool>>,
}

impl GbmDecisionTreeLearner {
    /// Starts a builder with default settings.
    pub fn builder() -> GbmDecisionTreeLearnerBuilder {
        GbmDecisionTreeLearnerBuilder::default()
    }

    get_field!(get_maximum_tree_depth, maximum_tree_depth, usize);
    get_field!(get_minimum_split_size, minimum_split_size, usize);
    get_field!(get_minimum_information_gain, minimum_information_gain, f64);
    get_field!(get_features_pr_split, features_pr_split, usize);
    get_field!(get_number_of_threads, number_of_threads, usize);

    pub fn get_loss(&self) -> &dyn GradientBoostLoss {
        self.loss.as_ref()
    }

    /// Learns a tree fitting `residuals` over the in-sample rows.
    ///
    /// # Parameters
    ///
    /// - `x` - Feature matrix with shape (n_samples, n_features)
    /// - `targets` - Original targets, used by losses with target-dependent statistics
    /// - `residuals` - Negative gradients the tree is fit to
    /// - `predictions` - Current ensemble predictions, used when leaf values are re-estimated
    /// - `ordered_elements` - Presorted row order per feature, see `create_ordered_elements`
    /// - `in_sample` - Rows taking part in this tree
    ///
    /// # Returns
    ///
    /// - `Result<GbmTree, ModelError>` - The tree, or an `InputValidationError` for inconsistent inputs
    pub fn learn(
        &self,
        x: ArrayView2<f64>,
        targets: &[f64],
        residuals: &[f64],
        predictions: &[f64],
        ordered_elements: &Array2<usize>,
        in_sample: &[bool],
    ) -> Result<GbmTree, ModelError> {
        preliminary_check(&x, Some(&ArrayView1::from(targets)))?;
        let (n_samples, feature_count) = x.dim();
        for (name, len) in [
            ("residuals", residuals.len()),
            ("predictions", predictions.len()),
            ("in-sample flags", in_sample.len()),
        ] {
            if len != n_samples {
                return Err(ModelError::InputValidationError(format!(
                    "Expected {} {}, got {}",
                    n_samples, name, len
                )));
            }
        }
        if ordered_elements.dim() != (feature_count, n_samples) {
            return Err(ModelError::InputValidationError(format!(
                "Ordered elements must have shape ({}, {}), got {:?}",
                feature_count,
                n_samples,
                ordered_elements.dim()
            )));
        }
        if !in_sample.iter().any(|&flag| flag) {
            return Err(ModelError::InputValidationError(
                "At least one in-sample row is required".to_string(),
            ));
        }

        let features_pr_split = if self.features_pr_split == 0 {
            feature_count
        } else {
            self.features_pr_split
        };
        validate_features_pr_split(features_pr_split, feature_count, false)?;

        let context = SearchContext {
            x: x.reborrow(),
            targets,
            residuals,
            ordered_elements,
        };

        let root_values = self.loss.init_split(targets, residuals, in_sample);
        let mut best_constant = root_values.best_constant;
        if self.loss.updates_leaf_values() {
            best_constant = self
                .loss
                .updated_leaf_value(best_constant, targets, predictions, in_sample);
        }

        debug!(
            n_samples = root_values.samples,
            n_features = feature_count,
            features_pr_split = features_pr_split,
            maximum_tree_depth = self.maximum_tree_depth,
            number_of_threads = self.number_of_threads,
            "fitting gradient boosting tree"
        );

        let mut nodes = vec![GbmNode {
            feature_index: None,
            split_value: -1.0,
            left_constant: best_constant,
            right_constant: best_constant,
            left_error: root_values.cost,
            right_error: root_values.cost,
            left: None,
            right: None,
            depth: 0,
            sample_count: root_values.samples,
        }];

        let mut queue = VecDeque::new();
        queue.push_back(WorkItem {
            parent: 0,
            values: root_values,
            in_sample: in_sample.to_vec(),
            depth: 1,
        });

        let mut all_features: Vec<usize> = (0..feature_count).collect();
        let mut rng = StdRng::seed_from_u64(FEATURE_SHUFFLE_SEED);

        while let Some(item) = queue.pop_front() {
            let features = if features_pr_split == feature_count {
                all_features.clone()
            } else {
                all_features.shuffle(&mut rng);
                all_features[..features_pr_split].to_vec()
            };

            let Some(best) = self.search_features(context, &item, &features) else {
                continue;
            };
            let split = best.best_split;

            let node_index = nodes.len();
            let mut node = split.to_node();
            match item.values.position {
                NodePosition::Left => nodes[item.parent].left = Some(node_index),
                NodePosition::Right => nodes[item.parent].right = Some(node_index),
                NodePosition::Root => {}
            }

            let is_leaf = item.depth >= self.maximum_tree_depth
                || split.cost_improvement <= self.minimum_information_gain;

            if is_leaf && !self.loss.updates_leaf_values() {
                nodes.push(node);
                continue;
            }

            let (left_in_sample, right_in_sample) =
                partition(ordered_elements, &split, &item.in_sample);

            if self.loss.updates_leaf_values() {
                node.left_constant = self.loss.updated_leaf_value(
                    node.left_constant,
                    targets,
                    predictions,
                    &left_in_sample,
                );
                node.right_constant = self.loss.updated_leaf_value(
                    node.right_constant,
                    targets,
                    predictions,
                    &right_in_sample,
                );
            }
            nodes.push(node);

            if is_leaf {
                continue;
            }

            trace!(
                node = node_index,
                feature = split.feature_index,
                split_value = split.split_value,
                cost_improvement = split.cost_improvement,
                depth = item.depth,
                "accepted split"
            );

            queue.push_back(WorkItem {
                parent: node_index,
                values: best.left.copy(NodePosition::Left),
                in_sample: left_in_sample,
                depth: item.depth + 1,
            });
            queue.push_back(WorkItem {
                parent: node_index,
                values: best.right.copy(NodePosition::Right),
                in_sample: right_in_sample,
                depth: item.depth + 1,
            });
        }

        debug!(
            n_nodes = nodes.len(),
            depth = nodes.iter().map(|n| n.depth).max().unwrap_or(0),
            "gradient boosting tree built"
        );

        GbmTree::new(nodes)
    }

    /// Searches every feature of `features` and keeps the first cheapest result.
    fn search_features(
        &self,
        context: SearchContext,
        item: &WorkItem,
        features: &[usize],
    ) -> Option<GbmSplitResult> {
        let results: Vec<Option<GbmSplitResult>> = match &self.pool {
            Some(pool) => pool.install(|| {
                features
                    .par_iter()
                    .map(|&feature_index| self.find_best_split(context, item, feature_index))
                    .collect()
            }),
            None => features
                .iter()
                .map(|&feature_index| self.find_best_split(context, item, feature_index))
                .collect(),
        };

        results.into_iter().flatten().fold(None, |best, result| match best {
            Some(best) if best.best_split.cost <= result.best_split.cost => Some(best),
            _ => Some(result),
        })
    }

    /// Cheapest split of one feature over the node's in-sample rows.
    fn find_best_split(
        &self,
        context: SearchContext,
        item: &WorkItem,
        feature_index: usize,
    ) -> Option<GbmSplitResult> {
        let ordered = context.ordered_elements.row(feature_index);
        let in_sample = &item.in_sample;
        let next_allowed = |start: usize| (start..ordered.len()).find(|&i| in_sample[ordered[i]]);

        let mut position = next_allowed(0)?;
        if ordered.len() == 1 {
            return None;
        }

        let mut left = GbmSplitInfo::new_empty();
        let mut right = item.values.copy(NodePosition::Right);
        let mut best: Option<GbmSplitResult> = None;

        let mut row = ordered[position];
        self.loss.update_split_constants(
            &mut left,
            &mut right,
            context.targets[row],
            context.residuals[row],
        );
        let mut previous_value = context.x[[row, feature_index]];

        while right.samples > 0 {
            let Some(next) = next_allowed(position + 1) else {
                break;
            };
            position = next;
            row = ordered[position];
            let current_value = context.x[[row, feature_index]];

            if left.samples.min(right.samples) >= self.minimum_split_size
                && previous_value != current_value
            {
                let cost = left.cost + right.cost;
                let best_cost = best.map_or(f64::MAX, |b| b.best_split.cost);
                if cost < best_cost {
                    best = Some(GbmSplitResult {
                        best_split: GbmSplit {
                            depth: item.depth,
                            feature_index,
                            split_index: position,
                            split_value: (previous_value + current_value) * 0.5,
                            left_constant: left.best_constant,
                            right_constant: right.best_constant,
                            left_error: left.cost,
                            right_error: right.cost,
                            cost,
                            cost_improvement: item.values.cost - cost,
                            sample_count: item.values.samples,
                        },
                        left,
                        right,
                    });
                }
            }

            self.loss.update_split_constants(
                &mut left,
                &mut right,
                context.targets[row],
                context.residuals[row],
            );
            previous_value = current_value;
        }

        best
    }
}

/// In-sample flags of the two children: rows before the split position go left.
pub(crate) fn partition(
    ordered_elements: &Array2<usize>,
    split: &GbmSplit,
    parent_in_sample: &[bool],
) -> (Vec<bool>, Vec<bool>) {
    let mut left = vec![false; parent_in_sample.len()];
    let mut right = vec![false; parent_in_sample.len()];

    for (position, &row) in ordered_elements.row(split.feature_index).iter().enumerate() {
        if position < split.split_index {
            left[row] = parent_in_sample[row];
        } else {
            right[row] = parent_in_sample[row];
        }
    }

    (left, right)
}
