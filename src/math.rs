use ahash::AHashMap;
use ndarray::{ArrayBase, Data, Ix1};

/// Counts how often each class code occurs, skipping NaN values.
///
/// Class codes are keyed with three decimal places of precision. The counts are
/// returned in ascending class order so that any sum over them is independent of
/// hash-map iteration order.
fn sorted_class_counts<S>(y: &ArrayBase<S, Ix1>) -> Vec<(i64, usize)>
where
    S: Data<Elem = f64>,
{
    let mut class_counts: AHashMap<i64, usize> = AHashMap::with_capacity(10);

    y.fold((), |_, &value| {
        if value.is_nan() {
            return;
        }
        let key = (value * 1000.0).round() as i64;
        *class_counts.entry(key).or_insert(0) += 1;
    });

    let mut counts: Vec<(i64, usize)> = class_counts.into_iter().collect();
    counts.sort_unstable_by_key(|&(key, _)| key);
    counts
}

/// Calculates the Gini impurity of a label set.
///
/// Gini impurity measures how frequently a randomly chosen element would be
/// mislabeled if it were randomly labeled according to the distribution of labels.
/// It is computed as `1 - Σ count² / n²`, which is exact for integer counts.
///
/// # Parameters
///
/// - `y` - Class labels stored in a 1D array
///
/// # Returns
///
/// - `f64` - Gini impurity in the range \[0.0, 1.0\]
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustytrees::math::gini;
///
/// let labels = array![0.0, 0.0, 1.0, 1.0];
/// let gini_val = gini(&labels);
/// // For two classes with equal frequency, Gini = 1 - (2^2 + 2^2) / 4^2 = 0.5
/// assert!((gini_val - 0.5).abs() < 1e-12);
/// ```
#[inline]
pub fn gini<S>(y: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    let total_samples = y.len() as f64;
    if total_samples == 0.0 {
        return 0.0;
    }

    let counts = sorted_class_counts(y);
    if counts.is_empty() {
        return 0.0;
    }

    let sum_of_squared_counts = counts
        .iter()
        .fold(0.0, |acc, &(_, count)| acc + (count * count) as f64);

    1.0 - sum_of_squared_counts / (total_samples * total_samples)
}

/// Calculates the Shannon entropy (in bits) of a label set.
///
/// Class proportions are clamped away from zero before the logarithm is taken so
/// that the result is always finite.
///
/// # Parameters
///
/// - `y` - Class labels stored in a 1D array
///
/// # Returns
///
/// - `f64` - Entropy value of the dataset (0.0 for homogeneous data)
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustytrees::math::entropy;
///
/// let labels = array![0.0, 1.0, 1.0, 0.0];
/// let ent = entropy(&labels);
/// // For two classes with equal frequency, entropy = 1.0
/// assert!((ent - 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn entropy<S>(y: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    let total_samples = y.len() as f64;
    if total_samples == 0.0 {
        return 0.0;
    }

    sorted_class_counts(y)
        .iter()
        .fold(0.0, |acc, &(_, count)| {
            let p = (count as f64 / total_samples).max(f64::MIN_POSITIVE);
            acc - p * p.log2()
        })
}

/// Calculates the population variance of a dataset.
///
/// Non-finite values are skipped when accumulating squared deviations.
///
/// # Parameters
///
/// - `y` - Values stored in a 1D array
///
/// # Returns
///
/// - `f64` - Mean of the squared deviations from the mean, 0.0 for empty input
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustytrees::math::variance;
///
/// let values = array![1.0, 2.0, 3.0];
/// let var = variance(&values);
/// // Mean is 2.0, so variance = (1 + 0 + 1) / 3 ~= 0.66667
/// assert!((var - 0.6666667).abs() < 1e-6);
/// ```
#[inline]
pub fn variance<S>(y: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    let n = y.len();
    if n == 0 {
        return 0.0;
    }

    let mean = match y.mean() {
        Some(m) if m.is_finite() => m,
        _ => return 0.0,
    };

    let sum_squared_diff = y.fold(0.0, |acc, &val| {
        if val.is_finite() {
            let diff = val - mean;
            acc + diff * diff
        } else {
            acc
        }
    });

    sum_squared_diff / n as f64
}

/// Calculates the sample variance with a single pass over the data.
///
/// Uses the running sum and sum of squares, `(Σy² - (Σy)²/n) / (n - 1)`, in the
/// order the values are stored. Returns 0.0 when fewer than two values are given.
///
/// # Parameters
///
/// - `y` - Values stored in a 1D array
///
/// # Returns
///
/// - `f64` - Unbiased sample variance
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustytrees::math::sample_variance;
///
/// let values = array![1.0, 2.0, 3.0];
/// assert!((sample_variance(&values) - 1.0).abs() < 1e-12);
/// assert_eq!(sample_variance(&array![5.0]), 0.0);
/// ```
#[inline]
pub fn sample_variance<S>(y: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    let n = y.len();
    if n < 2 {
        return 0.0;
    }

    let (sum, sum_of_squares) = y.fold((0.0, 0.0), |(sum, sum_sq), &value| {
        (sum + value, sum_sq + value * value)
    });

    (sum_of_squares - sum * sum / n as f64) / (n - 1) as f64
}

/// Calculates the median of a dataset.
///
/// # Parameters
///
/// - `values` - Values stored in a 1D array
///
/// # Returns
///
/// - `f64` - The middle value, or the mean of the two middle values for even lengths. 0.0 for empty input
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustytrees::math::median;
///
/// assert_eq!(median(&array![3.0, 1.0, 2.0]), 2.0);
/// assert_eq!(median(&array![4.0, 1.0, 2.0, 3.0]), 2.5);
/// ```
pub fn median<S>(values: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    let n = values.len();
    if n == 0 {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) * 0.5
    } else {
        sorted[n / 2]
    }
}

/// Computes the logistic sigmoid for a scalar input.
///
/// The sigmoid maps any real number into the open interval (0, 1) with clipping
/// for extreme values to preserve numerical stability.
///
/// # Parameters
///
/// - `z` - Input value to transform
///
/// # Returns
///
/// - `f64` - Sigmoid output in the range (0, 1)
///
/// # Examples
/// ```rust
/// use rustytrees::math::sigmoid;
///
/// let value = sigmoid(0.0);
/// assert!((value - 0.5).abs() < 1e-6);
/// ```
#[inline]
pub fn sigmoid(z: f64) -> f64 {
    let z = z.clamp(-500.0, 500.0);
    1.0 / (1.0 + (-z).exp())
}
