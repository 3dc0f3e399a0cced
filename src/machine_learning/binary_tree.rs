use crate::ModelError;
use ahash::AHashMap;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Type of a node in a binary decision tree.
///
/// # Variants
///
/// - `Internal` - A decision node.
///   - `feature_index`: Index of the feature used for splitting.
///   - `threshold`: Samples with `x[feature_index] <= threshold` go to the left child.
///   - `impurity_improvement`: Impurity reduction achieved by the split.
/// - `Leaf` - A terminal node.
///   - `value`: Class code for classification, mean target for regression.
///   - `probabilities`: Class probabilities in `target_names` order, `None` for regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeType {
    Internal {
        feature_index: usize,
        threshold: f64,
        impurity_improvement: f64,
    },
    Leaf {
        value: f64,
        probabilities: Option<Vec<f64>>,
    },
}

/// A node of a [`BinaryTree`].
///
/// Children are positions in the tree's flat node array, never pointers. Internal
/// nodes always have both children; leaves have neither.
///
/// # Fields
///
/// - `node_type` - Split or leaf payload
/// - `left` / `right` - Positions of the children in the node array
/// - `depth` - Distance from the root, which has depth 0
/// - `sample_count` - Number of training samples that reached the node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub node_type: NodeType,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub depth: usize,
    pub sample_count: usize,
}

impl Node {
    /// Creates a new leaf node.
    ///
    /// # Parameters
    ///
    /// - `value` - The predicted value
    /// - `probabilities` - For classification, the class probabilities
    /// - `depth` - Distance from the root
    /// - `sample_count` - Number of training samples in the leaf
    pub fn new_leaf(
        value: f64,
        probabilities: Option<Vec<f64>>,
        depth: usize,
        sample_count: usize,
    ) -> Self {
        Node {
            node_type: NodeType::Leaf {
                value,
                probabilities,
            },
            left: None,
            right: None,
            depth,
            sample_count,
        }
    }

    /// Creates a new internal node whose children are linked in later.
    pub fn new_internal(
        feature_index: usize,
        threshold: f64,
        impurity_improvement: f64,
        depth: usize,
        sample_count: usize,
    ) -> Self {
        Node {
            node_type: NodeType::Internal {
                feature_index,
                threshold,
                impurity_improvement,
            },
            left: None,
            right: None,
            depth,
            sample_count,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node_type, NodeType::Leaf { .. })
    }
}

/// Immutable binary decision tree stored as a flat node array with the root at index 0.
///
/// Produced by [`CartLearner`](super::cart::CartLearner) and
/// [`DecisionTreeLearner`](super::decision_tree::DecisionTreeLearner).
///
/// # Fields
///
/// - `nodes` - Flat node array, children always stored after their parent
/// - `target_names` - Sorted distinct class codes seen in training, empty for regression
/// - `variable_importance` - Raw importance per feature, accumulated during training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryTree {
    nodes: Vec<Node>,
    target_names: Vec<f64>,
    variable_importance: Vec<f64>,
}

impl BinaryTree {
    /// Wraps a finished node array after checking its structure.
    ///
    /// # Parameters
    ///
    /// - `nodes` - Node array with the root at index 0
    /// - `target_names` - Sorted distinct class codes, empty for regression
    /// - `variable_importance` - Raw importance per feature; its length is the feature count
    ///
    /// # Returns
    ///
    /// - `Ok(BinaryTree)` - The tree
    /// - `Err(ModelError::TreeError)` - If the array is empty, an internal node lacks a child, or a child does not come after its parent
    pub fn new(
        nodes: Vec<Node>,
        target_names: Vec<f64>,
        variable_importance: Vec<f64>,
    ) -> Result<Self, ModelError> {
        if nodes.is_empty() {
            return Err(ModelError::TreeError("A tree needs at least a root node"));
        }

        for (index, node) in nodes.iter().enumerate() {
            match node.node_type {
                NodeType::Internal { feature_index, .. } => {
                    if feature_index >= variable_importance.len() {
                        return Err(ModelError::TreeError(
                            "Split feature index exceeds the feature count",
                        ));
                    }
                    for child in [node.left, node.right] {
                        match child {
                            Some(child) if child > index && child < nodes.len() => {}
                            Some(_) => {
                                return Err(ModelError::TreeError(
                                    "Child index must point forward inside the node array",
                                ));
                            }
                            None => {
                                return Err(ModelError::TreeError(
                                    "Internal node is missing a child",
                                ));
                            }
                        }
                    }
                }
                NodeType::Leaf { .. } => {
                    if node.left.is_some() || node.right.is_some() {
                        return Err(ModelError::TreeError("Leaf node must not have children"));
                    }
                }
            }
        }

        Ok(BinaryTree {
            nodes,
            target_names,
            variable_importance,
        })
    }

    get_field_as_ref!(nodes, nodes, &[Node]);
    get_field_as_ref!(target_names, target_names, &[f64]);
    get_field_as_ref!(raw_variable_importance, variable_importance, &[f64]);

    /// Number of features the tree was trained on.
    pub fn feature_count(&self) -> usize {
        self.variable_importance.len()
    }

    /// Whether leaves carry class probabilities.
    pub fn is_classification(&self) -> bool {
        !self.target_names.is_empty()
    }

    /// Largest node depth; 0 for a single-leaf tree.
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    fn check_features(&self, x: &[f64]) -> Result<(), ModelError> {
        if x.len() != self.feature_count() {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }
        Ok(())
    }

    /// Walks from the root to the leaf reached by `x`.
    fn leaf_for(&self, x: &[f64]) -> Result<&Node, ModelError> {
        let mut index = 0;
        loop {
            let node = self
                .nodes
                .get(index)
                .ok_or(ModelError::TreeError("Child index out of range"))?;

            match node.node_type {
                NodeType::Leaf { .. } => return Ok(node),
                NodeType::Internal {
                    feature_index,
                    threshold,
                    ..
                } => {
                    let next = if x[feature_index] <= threshold {
                        node.left
                    } else {
                        node.right
                    };
                    index = next.ok_or(ModelError::TreeError("Missing child"))?;
                }
            }
        }
    }

    /// Predicts the output for a single observation.
    ///
    /// # Parameters
    ///
    /// - `x` - Feature vector of length `feature_count()`
    ///
    /// # Returns
    ///
    /// - `Result<f64, ModelError>` - The predicted class code or regression value
    pub fn predict_one(&self, x: &[f64]) -> Result<f64, ModelError> {
        self.check_features(x)?;
        match &self.leaf_for(x)?.node_type {
            NodeType::Leaf { value, .. } => Ok(*value),
            NodeType::Internal { .. } => Err(ModelError::TreeError("Traversal ended on a split")),
        }
    }

    /// Predicts class probabilities for a single observation (classification only).
    ///
    /// # Returns
    ///
    /// - `Result<Vec<f64>, ModelError>` - Probabilities in `target_names()` order
    pub fn predict_proba_one(&self, x: &[f64]) -> Result<Vec<f64>, ModelError> {
        if !self.is_classification() {
            return Err(ModelError::TreeError(
                "predict_proba is only available for classification",
            ));
        }
        self.check_features(x)?;

        match &self.leaf_for(x)?.node_type {
            NodeType::Leaf { probabilities, .. } => probabilities
                .clone()
                .ok_or(ModelError::TreeError("No probabilities in leaf node")),
            NodeType::Internal { .. } => Err(ModelError::TreeError("Traversal ended on a split")),
        }
    }

    /// Predicts outputs for every row using parallel processing.
    ///
    /// Each row is predicted exactly as `predict_one` would predict it.
    ///
    /// # Parameters
    ///
    /// - `x` - Feature matrix with shape (n_samples, n_features)
    ///
    /// # Returns
    ///
    /// - `Result<Array1<f64>, ModelError>` - One prediction per row
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        if x.ncols() != self.feature_count() {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }

        let predictions: Result<Vec<f64>, ModelError> = x
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| with_row_slice(row, |values| self.predict_one(values)))
            .collect();

        Ok(Array1::from_vec(predictions?))
    }

    /// Predicts outputs for the given rows only, in the order of `indices`.
    ///
    /// # Parameters
    ///
    /// - `x` - Feature matrix with shape (n_samples, n_features)
    /// - `indices` - Rows to predict; may repeat
    ///
    /// # Returns
    ///
    /// - `Result<Array1<f64>, ModelError>` - One prediction per entry of `indices`
    pub fn predict_indexed(
        &self,
        x: ArrayView2<f64>,
        indices: &[usize],
    ) -> Result<Array1<f64>, ModelError> {
        if x.ncols() != self.feature_count() {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }
        super::helper_functions::validate_indices(indices, x.nrows())?;

        let predictions: Result<Vec<f64>, ModelError> = indices
            .par_iter()
            .map(|&index| with_row_slice(x.row(index), |values| self.predict_one(values)))
            .collect();

        Ok(Array1::from_vec(predictions?))
    }

    /// Predicts class probabilities for every row (classification only).
    ///
    /// # Returns
    ///
    /// - `Result<Array2<f64>, ModelError>` - Shape (n_samples, n_classes), rows in `target_names()` order
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, ModelError> {
        let indices: Vec<usize> = (0..x.nrows()).collect();
        self.predict_proba_indexed(x, &indices)
    }

    /// Predicts class probabilities for the given rows only, in the order of `indices`.
    pub fn predict_proba_indexed(
        &self,
        x: ArrayView2<f64>,
        indices: &[usize],
    ) -> Result<Array2<f64>, ModelError> {
        if !self.is_classification() {
            return Err(ModelError::TreeError(
                "predict_proba is only available for classification",
            ));
        }
        if x.ncols() != self.feature_count() {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }
        super::helper_functions::validate_indices(indices, x.nrows())?;

        let probabilities: Result<Vec<Vec<f64>>, ModelError> = indices
            .par_iter()
            .map(|&index| with_row_slice(x.row(index), |values| self.predict_proba_one(values)))
            .collect();
        let probabilities = probabilities?;

        let n_classes = self.target_names.len();
        let mut result = Array2::zeros((indices.len(), n_classes));
        for (i, proba) in probabilities.iter().enumerate() {
            for (j, &p) in proba.iter().enumerate() {
                result[[i, j]] = p;
            }
        }

        Ok(result)
    }

    /// Importance per named feature, scaled so the most important feature scores 100.
    ///
    /// # Parameters
    ///
    /// - `feature_name_to_index` - Map from feature name to column index
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<(String, f64)>)` - Pairs sorted by descending importance, ties by name. All zeros stay zero
    /// - `Err(ModelError::InputValidationError)` - If a mapped index exceeds the feature count
    pub fn variable_importance(
        &self,
        feature_name_to_index: &AHashMap<String, usize>,
    ) -> Result<Vec<(String, f64)>, ModelError> {
        scaled_variable_importance(&self.variable_importance, feature_name_to_index)
    }

    /// Generates a human-readable string representation of the tree structure.
    pub fn generate_tree_structure(&self) -> String {
        let mut output = String::from("Decision Tree Structure:\n");
        self.print_node(0, &mut output, "", true);
        output
    }

    fn print_node(&self, index: usize, output: &mut String, prefix: &str, is_last: bool) {
        let Some(node) = self.nodes.get(index) else {
            return;
        };
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{}{}", prefix, connector));

        match &node.node_type {
            NodeType::Leaf {
                value,
                probabilities,
            } => {
                output.push_str(&format!("Leaf: value={:.4}", value));
                if let Some(probs) = probabilities {
                    output.push_str(&format!(" probs={:?}", probs));
                }
                output.push('\n');
            }
            NodeType::Internal {
                feature_index,
                threshold,
                ..
            } => {
                output.push_str(&format!(
                    "Split: feature[{}] <= {:.4}\n",
                    feature_index, threshold
                ));

                let new_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
                if let Some(left) = node.left {
                    self.print_node(left, output, &new_prefix, false);
                }
                if let Some(right) = node.right {
                    self.print_node(right, output, &new_prefix, true);
                }
            }
        }
    }
}

/// Runs `f` on a row as a contiguous slice, copying only when the view is strided.
pub(crate) fn with_row_slice<T>(
    row: ArrayView1<f64>,
    f: impl FnOnce(&[f64]) -> Result<T, ModelError>,
) -> Result<T, ModelError> {
    match row.as_slice() {
        Some(values) => f(values),
        None => f(&row.to_vec()),
    }
}

/// Maps raw importances onto feature names, scaled so the maximum becomes 100.
pub(crate) fn scaled_variable_importance(
    raw_importance: &[f64],
    feature_name_to_index: &AHashMap<String, usize>,
) -> Result<Vec<(String, f64)>, ModelError> {
    let max = raw_importance.iter().fold(0.0_f64, |acc, &v| acc.max(v));
    let scale = |raw: f64| if max > 0.0 { raw / max * 100.0 } else { 0.0 };

    let mut importance = feature_name_to_index
        .iter()
        .map(|(name, &index)| {
            raw_importance
                .get(index)
                .map(|&raw| (name.clone(), scale(raw)))
                .ok_or_else(|| {
                    ModelError::InputValidationError(format!(
                        "Feature '{}' maps to index {} but the model has {} features",
                        name,
                        index,
                        raw_importance.len()
                    ))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    importance.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(importance)
}
