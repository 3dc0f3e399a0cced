use super::gbm_tree::GbmNode;
use serde::{Deserialize, Serialize};

/// Which side of its parent a node's statistics describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodePosition {
    Root,
    Left,
    Right,
}

/// Running aggregate statistics of the residuals on one side of a candidate split.
///
/// Losses update these incrementally as samples move from the right side to the left
/// side during a split scan, so every candidate split costs O(1) to evaluate.
///
/// # Fields
///
/// - `samples` - Number of samples on this side
/// - `sum` - Sum of residuals
/// - `sum_of_squares` - Sum of squared residuals
/// - `cost` - Loss-specific cost, the sum of squared deviations for all bundled losses
/// - `best_constant` - Loss-optimal constant prediction for this side
/// - `binomial_sum` - Sum of `(y - r)(1 - y + r)`, only maintained by the binomial loss
/// - `position` - Side of the parent this side represents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GbmSplitInfo {
    pub samples: usize,
    pub sum: f64,
    pub sum_of_squares: f64,
    pub cost: f64,
    pub best_constant: f64,
    pub binomial_sum: f64,
    pub position: NodePosition,
}

impl GbmSplitInfo {
    /// Statistics of an empty side.
    pub fn new_empty() -> Self {
        GbmSplitInfo {
            samples: 0,
            sum: 0.0,
            sum_of_squares: 0.0,
            cost: 0.0,
            best_constant: 0.0,
            binomial_sum: 0.0,
            position: NodePosition::Root,
        }
    }

    /// Snapshot of these statistics tagged with a new position.
    pub fn copy(&self, position: NodePosition) -> Self {
        GbmSplitInfo { position, ..*self }
    }
}

impl Default for GbmSplitInfo {
    fn default() -> Self {
        GbmSplitInfo::new_empty()
    }
}

/// Best split found for one feature of one node.
///
/// `split_index` is a position in the feature's presorted order: in-sample rows at
/// positions before it fall to the left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GbmSplit {
    pub depth: usize,
    pub feature_index: usize,
    pub split_index: usize,
    pub split_value: f64,
    pub left_constant: f64,
    pub right_constant: f64,
    pub left_error: f64,
    pub right_error: f64,
    pub cost: f64,
    pub cost_improvement: f64,
    pub sample_count: usize,
}

impl GbmSplit {
    /// Converts the split into an unlinked tree node.
    pub fn to_node(&self) -> GbmNode {
        GbmNode {
            feature_index: Some(self.feature_index),
            split_value: self.split_value,
            left_constant: self.left_constant,
            right_constant: self.right_constant,
            left_error: self.left_error,
            right_error: self.right_error,
            left: None,
            right: None,
            depth: self.depth,
            sample_count: self.sample_count,
        }
    }
}

/// A feature's best split together with the statistics of both resulting sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GbmSplitResult {
    pub best_split: GbmSplit,
    pub left: GbmSplitInfo,
    pub right: GbmSplitInfo,
}
