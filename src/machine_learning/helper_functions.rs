use crate::ModelError;
use ndarray::{Array2, ArrayBase, ArrayView2, Data, Ix1, Ix2};

/// Performs validation checks on the input data matrices.
///
/// This function validates that:
/// - The input data matrix is not empty and has at least one feature
/// - The input data does not contain NaN or infinite values
/// - When a target vector is provided:
///   - The target vector length matches the number of rows in the input data
///   - The target vector does not contain NaN or infinite values
///
/// # Parameters
///
/// - `x` - A 2D array of feature values where rows represent samples and columns represent features
/// - `y` - An optional 1D array representing the target values corresponding to each sample
///
/// # Returns
///
/// - `Ok(())` - If all validation checks pass
/// - `Err(ModelError::InputValidationError)` - If any validation check fails, with an informative error message
pub fn preliminary_check<S1, S2>(
    x: &ArrayBase<S1, Ix2>,
    y: Option<&ArrayBase<S2, Ix1>>,
) -> Result<(), ModelError>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    if x.nrows() == 0 {
        return Err(ModelError::InputValidationError(
            "Input data is empty".to_string(),
        ));
    }

    if x.ncols() == 0 {
        return Err(ModelError::InputValidationError(
            "Input data has no features".to_string(),
        ));
    }

    for (i, row) in x.outer_iter().enumerate() {
        for (j, &val) in row.iter().enumerate() {
            if !val.is_finite() {
                return Err(ModelError::InputValidationError(format!(
                    "Input data contains NaN or infinite value at position [{}][{}]",
                    i, j
                )));
            }
        }
    }

    if let Some(y) = y {
        if y.len() != x.nrows() {
            return Err(ModelError::InputValidationError(format!(
                "Input data and target vector have different lengths, x rows: {}, y length: {}",
                x.nrows(),
                y.len()
            )));
        }

        if let Some(position) = y.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::InputValidationError(format!(
                "Target vector contains NaN or infinite value at position {}",
                position
            )));
        }
    }

    Ok(())
}

/// Validates a caller-supplied subset of row indices.
///
/// # Parameters
///
/// - `indices` - Row indices, repetitions allowed
/// - `n_rows` - Number of rows the indices refer to
///
/// # Returns
///
/// - `Ok(())` - If every index is in range
/// - `Err(ModelError::InputValidationError)` - If an index is out of range
pub fn validate_indices(indices: &[usize], n_rows: usize) -> Result<(), ModelError> {
    if let Some(&index) = indices.iter().find(|&&index| index >= n_rows) {
        return Err(ModelError::InputValidationError(format!(
            "Index {} is out of range for {} rows",
            index, n_rows
        )));
    }
    Ok(())
}

/// Validates per-sample weights. An empty slice means unit weights and is always valid.
///
/// # Parameters
///
/// - `weights` - One weight per row, or empty
/// - `n_rows` - Number of rows in the data
///
/// # Returns
///
/// - `Ok(())` - If the weights are empty, or one finite non-negative weight per row
/// - `Err(ModelError::InputValidationError)` - Otherwise
pub fn validate_weights(weights: &[f64], n_rows: usize) -> Result<(), ModelError> {
    if weights.is_empty() {
        return Ok(());
    }

    if weights.len() != n_rows {
        return Err(ModelError::InputValidationError(format!(
            "Expected {} sample weights, got {}",
            n_rows,
            weights.len()
        )));
    }

    if let Some(position) = weights.iter().position(|w| !w.is_finite() || *w < 0.0) {
        return Err(ModelError::InputValidationError(format!(
            "Sample weight at position {} must be finite and non-negative, got {}",
            position, weights[position]
        )));
    }

    Ok(())
}

/// Validates that the maximum tree depth is greater than zero.
///
/// # Returns
///
/// - `Ok(())` - If `maximum_tree_depth > 0`
/// - `Err(ModelError::ConfigurationError)` - Otherwise
pub fn validate_maximum_tree_depth(maximum_tree_depth: usize) -> Result<(), ModelError> {
    if maximum_tree_depth == 0 {
        return Err(ModelError::ConfigurationError(
            "maximum tree depth must be larger than 0".to_string(),
        ));
    }
    Ok(())
}

/// Validates that the minimum split size is greater than zero.
pub fn validate_minimum_split_size(minimum_split_size: usize) -> Result<(), ModelError> {
    if minimum_split_size == 0 {
        return Err(ModelError::ConfigurationError(
            "minimum split size must be larger than 0".to_string(),
        ));
    }
    Ok(())
}

/// Validates that the minimum information gain is positive and finite.
///
/// # Returns
///
/// - `Ok(())` - If the gain is valid
/// - `Err(ModelError::ConfigurationError)` - If the gain is non-positive, NaN, or infinite
pub fn validate_minimum_information_gain(minimum_information_gain: f64) -> Result<(), ModelError> {
    if minimum_information_gain <= 0.0 || !minimum_information_gain.is_finite() {
        return Err(ModelError::ConfigurationError(format!(
            "minimum information gain must be positive and finite, got {}",
            minimum_information_gain
        )));
    }
    Ok(())
}

/// Validates that at least one worker thread is requested.
pub fn validate_number_of_threads(number_of_threads: usize) -> Result<(), ModelError> {
    if number_of_threads < 1 {
        return Err(ModelError::ConfigurationError(
            "number of threads must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Validates that the learning rate parameter is positive and finite.
///
/// # Parameters
///
/// * `learning_rate` - The learning rate value to validate
///
/// # Returns
///
/// - `Ok(())` - If the learning rate is valid (positive and finite)
/// - `Err(ModelError::ConfigurationError)` - If the learning rate is invalid (non-positive, NaN, or infinite)
pub fn validate_learning_rate(learning_rate: f64) -> Result<(), ModelError> {
    if learning_rate <= 0.0 || !learning_rate.is_finite() {
        return Err(ModelError::ConfigurationError(format!(
            "learning_rate must be positive and finite, got {}",
            learning_rate
        )));
    }
    Ok(())
}

/// Validates that the number of boosting iterations is greater than zero.
pub fn validate_iterations(iterations: usize) -> Result<(), ModelError> {
    if iterations == 0 {
        return Err(ModelError::ConfigurationError(
            "iterations must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

/// Validates that the sub-sample ratio lies in `(0, 1]`.
pub fn validate_sub_sample_ratio(sub_sample_ratio: f64) -> Result<(), ModelError> {
    if !(sub_sample_ratio > 0.0 && sub_sample_ratio <= 1.0) {
        return Err(ModelError::ConfigurationError(format!(
            "sub_sample_ratio must be in (0, 1], got {}",
            sub_sample_ratio
        )));
    }
    Ok(())
}

/// Validates the number of features drawn per split against the available features.
///
/// # Parameters
///
/// - `features_pr_split` - Requested features per split
/// - `feature_count` - Features in the data
/// - `allow_zero` - Whether 0 is accepted as a shorthand for all features
pub fn validate_features_pr_split(
    features_pr_split: usize,
    feature_count: usize,
    allow_zero: bool,
) -> Result<(), ModelError> {
    if features_pr_split == 0 && !allow_zero {
        return Err(ModelError::ConfigurationError(
            "features per split must be larger than 0".to_string(),
        ));
    }
    if features_pr_split > feature_count {
        return Err(ModelError::ConfigurationError(format!(
            "features per split ({}) exceeds the number of features ({})",
            features_pr_split, feature_count
        )));
    }
    Ok(())
}

/// Number of worker threads used when none is configured.
pub fn default_number_of_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Row indices sorted ascending by each feature.
///
/// Row `f` of the result lists every row index of `x`, stable-sorted by `x[., f]`,
/// so rows with equal feature values keep their original relative order.
///
/// # Parameters
///
/// - `x` - Feature matrix with shape (n_samples, n_features)
///
/// # Returns
///
/// - `Array2<usize>` - Shape (n_features, n_samples)
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustytrees::machine_learning::create_ordered_elements;
///
/// let x = array![[3.0, 1.0], [1.0, 1.0], [2.0, 0.0]];
/// let ordered = create_ordered_elements(x.view());
/// assert_eq!(ordered.row(0).to_vec(), vec![1, 2, 0]);
/// assert_eq!(ordered.row(1).to_vec(), vec![2, 0, 1]);
/// ```
pub fn create_ordered_elements(x: ArrayView2<f64>) -> Array2<usize> {
    let (n_samples, n_features) = x.dim();
    let mut ordered = Array2::zeros((n_features, n_samples));

    for (feature_index, mut row) in ordered.outer_iter_mut().enumerate() {
        let column = x.column(feature_index);
        let mut indices: Vec<usize> = (0..n_samples).collect();
        indices.sort_by(|&a, &b| column[a].total_cmp(&column[b]));
        for (slot, index) in row.iter_mut().zip(indices) {
            *slot = index;
        }
    }

    ordered
}

/// Sorted distinct class codes of the given targets.
///
/// # Examples
/// ```rust
/// use rustytrees::machine_learning::distinct_targets;
///
/// assert_eq!(distinct_targets([2.0, 0.0, 2.0, 1.0].iter().copied()), vec![0.0, 1.0, 2.0]);
/// ```
pub fn distinct_targets(targets: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut names: Vec<f64> = targets.into_iter().collect();
    names.sort_by(f64::total_cmp);
    names.dedup();
    names
}
