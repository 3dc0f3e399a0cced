use ndarray::{ArrayBase, Data, Ix1};

/// Panics with a uniform message when two metric inputs differ in length.
fn assert_same_length(first: usize, second: usize) {
    if first != second {
        panic!(
            "Input arrays must have the same length. Actual: {}, Predicted: {}",
            first, second
        );
    }
}

/// Calculates the Mean Squared Error between actual and predicted values.
///
/// # Parameters
///
/// - `y_true` - Ground-truth values for each sample
/// - `y_pred` - Predicted values for each sample
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustytrees::metric::mean_squared_error;
///
/// let actual = array![3.0, -0.5, 2.0, 7.0];
/// let predicted = array![2.5, 0.0, 2.1, 7.8];
/// let mse = mean_squared_error(&actual, &predicted);
/// assert!((mse - 0.2875).abs() < 1e-10);
/// ```
///
/// # Returns
///
/// - `f64` - Mean squared error (returns 0.0 when the input arrays are empty)
///
/// # Panics
///
/// - Panics if the two arrays have different lengths
pub fn mean_squared_error<S1, S2>(y_true: &ArrayBase<S1, Ix1>, y_pred: &ArrayBase<S2, Ix1>) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    assert_same_length(y_true.len(), y_pred.len());

    let n = y_true.len();
    if n == 0 {
        return 0.0;
    }

    let sum_squared_diff = y_true
        .iter()
        .zip(y_pred.iter())
        .fold(0.0, |acc, (&actual, &pred)| {
            let error = actual - pred;
            acc + error * error
        });

    sum_squared_diff / n as f64
}

/// Calculates the fraction of misclassified observations.
///
/// Class codes are compared exactly, since trees predict the stored class code of a leaf.
///
/// # Parameters
///
/// - `y_true` - Ground-truth class codes
/// - `y_pred` - Predicted class codes
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustytrees::metric::classification_error;
///
/// let actual = array![0.0, 1.0, 1.0, 0.0];
/// let predicted = array![0.0, 1.0, 0.0, 0.0];
/// assert_eq!(classification_error(&actual, &predicted), 0.25);
/// ```
///
/// # Returns
///
/// - `f64` - Error rate in the range \[0.0, 1.0\] (returns 0.0 when the input arrays are empty)
///
/// # Panics
///
/// - Panics if the two arrays have different lengths
pub fn classification_error<S1, S2>(
    y_true: &ArrayBase<S1, Ix1>,
    y_pred: &ArrayBase<S2, Ix1>,
) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    assert_same_length(y_true.len(), y_pred.len());

    if y_true.is_empty() {
        return 0.0;
    }

    let errors = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|&(actual, predicted)| actual != predicted)
        .count();

    errors as f64 / y_true.len() as f64
}

/// Calculate the accuracy of a classification model.
///
/// Accuracy is the proportion of correctly predicted samples over all samples.
///
/// # Parameters
///
/// - `y_true` - Ground-truth class codes
/// - `y_pred` - Predicted class codes
///
/// # Examples
/// ```rust
/// use rustytrees::metric::accuracy;
/// use ndarray::array;
///
/// let actual = array![0.0, 0.0, 1.0];
/// let predicted = array![0.0, 1.0, 1.0];
/// let acc = accuracy(&actual, &predicted);
/// assert!((acc - 0.6666666666666667).abs() < 1e-6);
/// ```
///
/// # Returns
///
/// - `f64` - Accuracy in the range \[0.0, 1.0\]
///
/// # Panics
///
/// - Panics if the two arrays have different lengths
/// - Panics if input arrays are empty
pub fn accuracy<S1, S2>(y_true: &ArrayBase<S1, Ix1>, y_pred: &ArrayBase<S2, Ix1>) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    assert_same_length(y_true.len(), y_pred.len());

    if y_true.is_empty() {
        panic!("Input arrays must not be empty");
    }

    1.0 - classification_error(y_true, y_pred)
}
