/// Binary tree model with a flat node array
pub mod binary_tree;
/// Depth-first CART learner built on impurity metrics and split searchers
pub mod cart;
/// Queue-based decision tree learner with feature sub-sampling and sample weights
pub mod decision_tree;
/// Loss functions for gradient boosted trees
pub mod gbm_loss;
/// Split statistics exchanged between gradient boosting losses and the tree builder
pub mod gbm_split;
/// Regression tree produced by the gradient boosting tree builder
pub mod gbm_tree;
/// Gradient boosting tree builder, parallel across features
pub mod gbm_tree_learner;
/// Stage-wise gradient boosting for regression and binary classification
pub mod gradient_boost;
/// This module provides helper functions for machine learning models
pub mod helper_functions;
/// Incremental impurity bookkeeping for moving split boundaries
pub mod impurity_calculator;
/// Impurity metrics evaluated over an interval of targets
pub mod impurity_metric;
/// Half-open index ranges over a working array
pub mod interval;
/// Exhaustive and bisecting split search strategies
pub mod split_searcher;

pub use binary_tree::*;
pub use cart::*;
pub use decision_tree::*;
pub use gbm_loss::*;
pub use gbm_split::*;
pub use gbm_tree::*;
pub use gbm_tree_learner::*;
pub use gradient_boost::*;
pub use helper_functions::*;
pub use impurity_calculator::*;
pub use impurity_metric::*;
pub use interval::*;
pub use split_searcher::*;
