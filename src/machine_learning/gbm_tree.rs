use super::binary_tree::{scaled_variable_importance, with_row_slice};
use super::helper_functions::validate_indices;
use crate::ModelError;
use ahash::AHashMap;
use ndarray::{Array1, ArrayView2, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A split node of a [`GbmTree`].
///
/// Every node carries a constant for each side. A missing child means the sample is
/// predicted with that side's constant.
///
/// # Fields
///
/// - `feature_index` - Feature the node splits on, `None` for the root metadata node
/// - `split_value` - Samples with `x[feature_index] < split_value` go left
/// - `left_constant` / `right_constant` - Predictions for the two sides
/// - `left_error` / `right_error` - Cost of the two sides when the split was chosen
/// - `left` / `right` - Positions of the child nodes in the tree's node array
/// - `depth` - Depth of the node, the first real split has depth 1
/// - `sample_count` - In-sample rows that reached the node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbmNode {
    pub feature_index: Option<usize>,
    pub split_value: f64,
    pub left_constant: f64,
    pub right_constant: f64,
    pub left_error: f64,
    pub right_error: f64,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub depth: usize,
    pub sample_count: usize,
}

/// Regression tree produced by the gradient boosting tree builder.
///
/// Node 0 only records root statistics: its constant is the prediction of a tree
/// without splits, and its error is the baseline for variable importance. The first
/// real split, when there is one, is node 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbmTree {
    nodes: Vec<GbmNode>,
}

impl GbmTree {
    /// Creates a tree from a flat node array.
    ///
    /// # Returns
    ///
    /// - `Ok(GbmTree)` - If the array holds a root and every child position points forward to an existing node
    /// - `Err(ModelError::TreeError)` - Otherwise
    pub fn new(nodes: Vec<GbmNode>) -> Result<Self, ModelError> {
        if nodes.is_empty() {
            return Err(ModelError::TreeError("A tree needs a root node"));
        }

        for (index, node) in nodes.iter().enumerate() {
            if index > 0 && node.feature_index.is_none() {
                return Err(ModelError::TreeError("Split node without a feature"));
            }
            for child in [node.left, node.right].into_iter().flatten() {
                if child <= index || child >= nodes.len() {
                    return Err(ModelError::TreeError("Child position out of order"));
                }
            }
        }

        Ok(GbmTree { nodes })
    }

    get_field_as_ref!(nodes, nodes, &[GbmNode]);

    /// Number of real split nodes.
    pub fn split_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Predicts the output for a single observation.
    ///
    /// # Parameters
    ///
    /// - `x` - Feature vector
    ///
    /// # Returns
    ///
    /// - `Result<f64, ModelError>` - The constant of the side the observation ends on
    pub fn predict_one(&self, x: &[f64]) -> Result<f64, ModelError> {
        if self.nodes.len() == 1 {
            return Ok(self.nodes[0].left_constant);
        }

        let mut index = 1;
        loop {
            let node = &self.nodes[index];
            let feature_index = node
                .feature_index
                .ok_or(ModelError::TreeError("Split node without a feature"))?;
            let value = x
                .get(feature_index)
                .ok_or(ModelError::TreeError("Feature dimension mismatch"))?;

            let (child, constant) = if *value < node.split_value {
                (node.left, node.left_constant)
            } else {
                (node.right, node.right_constant)
            };

            match child {
                Some(child) => index = child,
                None => return Ok(constant),
            }
        }
    }

    /// Predicts every row of `x` in parallel.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        let predictions: Result<Vec<f64>, ModelError> = x
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| with_row_slice(row, |values| self.predict_one(values)))
            .collect();

        Ok(Array1::from_vec(predictions?))
    }

    /// Predicts the given rows only, in the order of `indices`.
    pub fn predict_indexed(
        &self,
        x: ArrayView2<f64>,
        indices: &[usize],
    ) -> Result<Array1<f64>, ModelError> {
        validate_indices(indices, x.nrows())?;

        let predictions: Result<Vec<f64>, ModelError> = indices
            .par_iter()
            .map(|&index| with_row_slice(x.row(index), |values| self.predict_one(values)))
            .collect();

        Ok(Array1::from_vec(predictions?))
    }

    /// Adds this tree's error reductions to `importance`.
    ///
    /// Each split contributes `reduction² · sample_count / root_sample_count`, where the
    /// reduction is measured against the combined error of both sides of its parent.
    /// A tree without splits contributes nothing.
    ///
    /// # Returns
    ///
    /// - `Err(ModelError::InputValidationError)` - If a split feature has no slot in `importance`
    pub fn add_raw_variable_importances(&self, importance: &mut [f64]) -> Result<(), ModelError> {
        if self.nodes.len() == 1 {
            return Ok(());
        }

        let root = &self.nodes[0];
        let total = root.sample_count as f64;
        let mut stack = vec![(1, root.left_error)];

        while let Some((index, previous_error)) = stack.pop() {
            let node = &self.nodes[index];
            let feature_index = node
                .feature_index
                .ok_or(ModelError::TreeError("Split node without a feature"))?;
            let error = node.left_error + node.right_error;
            let reduction = previous_error - error;

            let importance_len = importance.len();
            let slot = importance.get_mut(feature_index).ok_or_else(|| {
                ModelError::InputValidationError(format!(
                    "Feature index {} exceeds the importance length {}",
                    feature_index, importance_len
                ))
            })?;
            *slot += reduction * reduction * node.sample_count as f64 / total;

            for child in [node.right, node.left].into_iter().flatten() {
                stack.push((child, error));
            }
        }

        Ok(())
    }

    /// Raw importance of each of `feature_count` features.
    pub fn raw_variable_importance(&self, feature_count: usize) -> Result<Vec<f64>, ModelError> {
        let mut importance = vec![0.0; feature_count];
        self.add_raw_variable_importances(&mut importance)?;
        Ok(importance)
    }

    /// Importance per named feature, scaled so the most important feature scores 100.
    pub fn variable_importance(
        &self,
        feature_name_to_index: &AHashMap<String, usize>,
    ) -> Result<Vec<(String, f64)>, ModelError> {
        let feature_count = feature_name_to_index
            .values()
            .max()
            .map_or(0, |&max| max + 1);
        let raw = self.raw_variable_importance(feature_count)?;
        scaled_variable_importance(&raw, feature_name_to_index)
    }
}
