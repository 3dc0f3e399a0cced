use super::binary_tree::{scaled_variable_importance, with_row_slice};
use super::gbm_loss::{BinomialLoss, GradientBoostLoss};
use super::gbm_tree::GbmTree;
use super::gbm_tree_learner::GbmDecisionTreeLearner;
use super::helper_functions::{
    create_ordered_elements, default_number_of_threads, preliminary_check, validate_indices,
    validate_iterations, validate_learning_rate, validate_sub_sample_ratio,
};
use crate::ModelError;
use crate::math::sigmoid;
use ahash::AHashMap;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Hyperparameters shared by the gradient boosting learners.
///
/// # Fields
///
/// - `iterations` - Number of trees, must be > 0
/// - `learning_rate` - Shrinkage applied to every tree, must be positive
/// - `maximum_tree_depth` - Depth of each tree, must be > 0
/// - `minimum_split_size` - Smallest number of rows on either side of a split, must be > 0
/// - `minimum_information_gain` - Cost improvement a split must exceed to get children, must be > 0
/// - `sub_sample_ratio` - Fraction of the training rows drawn for each tree, in `(0, 1]`
/// - `features_pr_split` - Features drawn per split, 0 uses every feature
/// - `number_of_threads` - Worker threads for the split search, must be >= 1
/// - `seed` - Seed of the row sub-sampling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostParams {
    pub iterations: usize,
    pub learning_rate: f64,
    pub maximum_tree_depth: usize,
    pub minimum_split_size: usize,
    pub minimum_information_gain: f64,
    pub sub_sample_ratio: f64,
    pub features_pr_split: usize,
    pub number_of_threads: usize,
    pub seed: u64,
}

/// Defaults: 100 trees of depth 3 with learning rate 0.1, no sub-sampling, every
/// feature per split and one thread per available core.
impl Default for GradientBoostParams {
    fn default() -> Self {
        Self {
            iterations: 100,
            learning_rate: 0.1,
            maximum_tree_depth: 3,
            minimum_split_size: 1,
            minimum_information_gain: 1e-6,
            sub_sample_ratio: 1.0,
            features_pr_split: 0,
            number_of_threads: default_number_of_threads(),
            seed: 42,
        }
    }
}

/// An initial constant plus shrunken tree predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BoostedTrees {
    initial_loss: f64,
    learning_rate: f64,
    trees: Vec<GbmTree>,
    feature_count: usize,
}

impl BoostedTrees {
    fn predict_one(&self, x: &[f64]) -> Result<f64, ModelError> {
        if x.len() != self.feature_count {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }

        let mut prediction = self.initial_loss;
        for tree in &self.trees {
            prediction += self.learning_rate * tree.predict_one(x)?;
        }
        Ok(prediction)
    }

    fn predict_with<F>(&self, x: ArrayView2<f64>, f: F) -> Result<Array1<f64>, ModelError>
    where
        F: Fn(&[f64]) -> Result<f64, ModelError> + Sync,
    {
        if x.ncols() != self.feature_count {
            return Err(ModelError::TreeError("Feature dimension mismatch"));
        }

        let predictions: Result<Vec<f64>, ModelError> = x
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| with_row_slice(row, &f))
            .collect();

        Ok(Array1::from_vec(predictions?))
    }

    fn raw_variable_importance(&self) -> Result<Vec<f64>, ModelError> {
        let mut importance = vec![0.0; self.feature_count];
        for tree in &self.trees {
            tree.add_raw_variable_importances(&mut importance)?;
        }
        Ok(importance)
    }

    fn variable_importance(
        &self,
        feature_name_to_index: &AHashMap<String, usize>,
    ) -> Result<Vec<(String, f64)>, ModelError> {
        scaled_variable_importance(&self.raw_variable_importance()?, feature_name_to_index)
    }
}

/// Fits `params.iterations` trees stage-wise to the negative gradients of `loss`.
fn boost(
    params: &GradientBoostParams,
    loss: Arc<dyn GradientBoostLoss>,
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    indices: &[usize],
) -> Result<BoostedTrees, ModelError> {
    validate_iterations(params.iterations)?;
    validate_learning_rate(params.learning_rate)?;
    validate_sub_sample_ratio(params.sub_sample_ratio)?;
    preliminary_check(&x, Some(&y))?;
    validate_indices(indices, x.nrows())?;
    if indices.is_empty() {
        return Err(ModelError::InputValidationError(
            "At least one sample index is required".to_string(),
        ));
    }

    let learner = GbmDecisionTreeLearner::builder()
        .with_maximum_tree_depth(params.maximum_tree_depth)
        .with_minimum_split_size(params.minimum_split_size)
        .with_minimum_information_gain(params.minimum_information_gain)
        .with_features_pr_split(params.features_pr_split)
        .with_number_of_threads(params.number_of_threads)
        .with_loss(Arc::clone(&loss))
        .build()?;

    let n_samples = x.nrows();
    let targets = y.to_vec();
    let ordered_elements = create_ordered_elements(x);

    let mut in_sample = vec![false; n_samples];
    for &index in indices {
        in_sample[index] = true;
    }
    let mut work_indices: Vec<usize> = (0..n_samples).filter(|&i| in_sample[i]).collect();

    let initial_loss = loss.initial_loss(&targets, &in_sample);
    let mut predictions = vec![initial_loss; n_samples];
    let mut residuals = vec![0.0; n_samples];
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut trees = Vec::with_capacity(params.iterations);

    for iteration in 0..params.iterations {
        info!(
            iteration = iteration + 1,
            total = params.iterations,
            "fitting boosting tree"
        );

        loss.update_residuals(&targets, &predictions, &mut residuals, &in_sample);

        let tree = if params.sub_sample_ratio < 1.0 {
            let sample_size = ((params.sub_sample_ratio * work_indices.len() as f64).round()
                as usize)
                .max(1);
            work_indices.shuffle(&mut rng);
            let mut current_in_sample = vec![false; n_samples];
            for &index in &work_indices[..sample_size] {
                current_in_sample[index] = true;
            }
            learner.learn(
                x,
                &targets,
                &residuals,
                &predictions,
                &ordered_elements,
                &current_in_sample,
            )?
        } else {
            learner.learn(
                x,
                &targets,
                &residuals,
                &predictions,
                &ordered_elements,
                &in_sample,
            )?
        };

        let tree_predictions = tree.predict(x)?;
        for (prediction, tree_prediction) in predictions.iter_mut().zip(tree_predictions.iter()) {
            *prediction += params.learning_rate * tree_prediction;
        }
        trees.push(tree);
    }

    Ok(BoostedTrees {
        initial_loss,
        learning_rate: params.learning_rate,
        trees,
        feature_count: x.ncols(),
    })
}

/// Gradient boosting for regression.
///
/// Starts from the loss's initial constant, then repeatedly fits a
/// [`GbmDecisionTreeLearner`] tree to the negative gradients and adds it to the
/// ensemble scaled by the learning rate.
///
/// # Example
/// ```rust
/// use rustytrees::machine_learning::*;
/// use ndarray::array;
/// use std::sync::Arc;
///
/// let x = array![[1.0], [2.0], [3.0], [4.0], [5.0], [6.0]];
/// let y = array![1.0, 1.0, 1.0, 5.0, 5.0, 5.0];
///
/// let params = GradientBoostParams {
///     iterations: 50,
///     number_of_threads: 1,
///     ..GradientBoostParams::default()
/// };
/// let learner = RegressionGradientBoostLearner::new(params, Arc::new(SquaredLoss));
/// let model = learner.learn(x.view(), y.view()).unwrap();
///
/// assert!((model.predict_one(&[1.0]).unwrap() - 1.0).abs() < 0.1);
/// assert!((model.predict_one(&[6.0]).unwrap() - 5.0).abs() < 0.1);
/// ```
#[derive(Debug, Clone)]
pub struct RegressionGradientBoostLearner {
    params: GradientBoostParams,
    loss: Arc<dyn GradientBoostLoss>,
}

impl RegressionGradientBoostLearner {
    /// Creates a learner. Settings are validated when learning starts.
    pub fn new(params: GradientBoostParams, loss: Arc<dyn GradientBoostLoss>) -> Self {
        RegressionGradientBoostLearner { params, loss }
    }

    pub fn get_params(&self) -> &GradientBoostParams {
        &self.params
    }

    /// Learns an ensemble from every row of `x`.
    pub fn learn(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
    ) -> Result<RegressionGradientBoostModel, ModelError> {
        let indices: Vec<usize> = (0..x.nrows()).collect();
        self.learn_indexed(x, y, &indices)
    }

    /// Learns an ensemble from the given rows only.
    ///
    /// # Returns
    ///
    /// - `Result<RegressionGradientBoostModel, ModelError>` - The model, or a `ConfigurationError` / `InputValidationError`
    pub fn learn_indexed(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        indices: &[usize],
    ) -> Result<RegressionGradientBoostModel, ModelError> {
        let ensemble = boost(&self.params, Arc::clone(&self.loss), x, y, indices)?;
        Ok(RegressionGradientBoostModel { ensemble })
    }
}

/// Trained regression ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionGradientBoostModel {
    ensemble: BoostedTrees,
}

impl RegressionGradientBoostModel {
    pub fn get_initial_loss(&self) -> f64 {
        self.ensemble.initial_loss
    }

    pub fn get_learning_rate(&self) -> f64 {
        self.ensemble.learning_rate
    }

    pub fn trees(&self) -> &[GbmTree] {
        &self.ensemble.trees
    }

    /// Predicts a single observation.
    pub fn predict_one(&self, x: &[f64]) -> Result<f64, ModelError> {
        self.ensemble.predict_one(x)
    }

    /// Predicts every row of `x` in parallel.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        self.ensemble.predict_with(x, |row| self.ensemble.predict_one(row))
    }

    /// Raw importance per feature, summed over all trees.
    pub fn raw_variable_importance(&self) -> Result<Vec<f64>, ModelError> {
        self.ensemble.raw_variable_importance()
    }

    /// Importance per named feature, scaled so the most important feature scores 100.
    pub fn variable_importance(
        &self,
        feature_name_to_index: &AHashMap<String, usize>,
    ) -> Result<Vec<(String, f64)>, ModelError> {
        self.ensemble.variable_importance(feature_name_to_index)
    }
}

/// Gradient boosting for binary classification with targets coded 0 and 1.
///
/// Uses the binomial loss, so the ensemble predicts log-odds of class 1.
#[derive(Debug, Clone)]
pub struct ClassificationGradientBoostLearner {
    params: GradientBoostParams,
}

impl ClassificationGradientBoostLearner {
    /// Creates a learner. Settings are validated when learning starts.
    pub fn new(params: GradientBoostParams) -> Self {
        ClassificationGradientBoostLearner { params }
    }

    pub fn get_params(&self) -> &GradientBoostParams {
        &self.params
    }

    /// Learns an ensemble from every row of `x`.
    pub fn learn(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
    ) -> Result<ClassificationGradientBoostModel, ModelError> {
        let indices: Vec<usize> = (0..x.nrows()).collect();
        self.learn_indexed(x, y, &indices)
    }

    /// Learns an ensemble from the given rows only.
    ///
    /// # Returns
    ///
    /// - `Err(ModelError::InputValidationError)` - If a target of the given rows is neither 0 nor 1, or the rows are invalid
    pub fn learn_indexed(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        indices: &[usize],
    ) -> Result<ClassificationGradientBoostModel, ModelError> {
        validate_indices(indices, y.len())?;
        if let Some(&index) = indices.iter().find(|&&i| y[i] != 0.0 && y[i] != 1.0) {
            return Err(ModelError::InputValidationError(format!(
                "Binary classification targets must be 0 or 1, got {} at row {}",
                y[index], index
            )));
        }

        let ensemble = boost(&self.params, Arc::new(BinomialLoss), x, y, indices)?;
        Ok(ClassificationGradientBoostModel { ensemble })
    }
}

/// Trained binary classification ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationGradientBoostModel {
    ensemble: BoostedTrees,
}

impl ClassificationGradientBoostModel {
    pub fn trees(&self) -> &[GbmTree] {
        &self.ensemble.trees
    }

    /// Probability of class 1 for a single observation.
    pub fn predict_probability_one(&self, x: &[f64]) -> Result<f64, ModelError> {
        Ok(sigmoid(self.ensemble.predict_one(x)?))
    }

    /// Probability of class 1 for every row of `x`.
    pub fn predict_probability(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        self.ensemble
            .predict_with(x, |row| self.predict_probability_one(row))
    }

    /// Predicted class, 1 when the probability of class 1 is at least 0.5.
    pub fn predict_one(&self, x: &[f64]) -> Result<f64, ModelError> {
        let probability = self.predict_probability_one(x)?;
        Ok(if probability >= 0.5 { 1.0 } else { 0.0 })
    }

    /// Predicted class for every row of `x`.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        self.ensemble.predict_with(x, |row| self.predict_one(row))
    }

    /// Raw importance per feature, summed over all trees.
    pub fn raw_variable_importance(&self) -> Result<Vec<f64>, ModelError> {
        self.ensemble.raw_variable_importance()
    }

    /// Importance per named feature, scaled so the most important feature scores 100.
    pub fn variable_importance(
        &self,
        feature_name_to_index: &AHashMap<String, usize>,
    ) -> Result<Vec<(String, f64)>, ModelError> {
        self.ensemble.variable_importance(feature_name_to_index)
    }
}
