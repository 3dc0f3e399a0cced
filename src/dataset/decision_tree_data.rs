use super::raw_data::decision_tree_data_raw::load_decision_tree_data_raw_data;
use ndarray::{Array1, Array2};
use std::sync::OnceLock;

const DECISION_TREE_DATA_ROWS: usize = 200;
const DECISION_TREE_DATA_FEATURES: usize = 2;

static DECISION_TREE_DATA: OnceLock<(Array1<&'static str>, Array2<f64>, Array1<f64>)> =
    OnceLock::new();

/// Parses the embedded regression table into feature names, features and targets.
///
/// # Panics
///
/// This function will panic if the embedded table is malformed.
fn load_decision_tree_data_internal() -> (Array1<&'static str>, Array2<f64>, Array1<f64>) {
    let raw_data = load_decision_tree_data_raw_data();
    let mut lines = raw_data.trim().lines();

    let header_line = lines.next().unwrap();
    let headers = header_line
        .split(';')
        .take(DECISION_TREE_DATA_FEATURES)
        .collect::<Vec<&str>>();

    let mut features = Vec::with_capacity(DECISION_TREE_DATA_ROWS * DECISION_TREE_DATA_FEATURES);
    let mut targets = Vec::with_capacity(DECISION_TREE_DATA_ROWS);

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let cols: Vec<&str> = line.split(';').collect();
        for col in cols.iter().take(DECISION_TREE_DATA_FEATURES) {
            features.push(col.trim().parse::<f64>().unwrap());
        }
        targets.push(cols[DECISION_TREE_DATA_FEATURES].trim().parse::<f64>().unwrap());
    }

    let headers_array = Array1::from_vec(headers);
    let features_array = Array2::from_shape_vec(
        (DECISION_TREE_DATA_ROWS, DECISION_TREE_DATA_FEATURES),
        features,
    )
    .unwrap();
    let targets_array = Array1::from_vec(targets);

    (headers_array, features_array, targets_array)
}

/// Loads the two-feature regression dataset
///
/// `F1` is a constant column and `F2` drives the continuous target `T`, which makes
/// the dataset useful for checking that importance is attributed to the right feature.
///
/// # Returns
///
/// - `&'static Array1<&'static str>` - Feature names: `F1`, `F2`
/// - `&'static Array2<f64>` - Feature matrix with shape (200, 2)
/// - `&'static Array1<f64>` - Continuous targets
///
/// # Examples
/// ```rust
/// use rustytrees::dataset::decision_tree_data::load_decision_tree_data;
///
/// let (headers, features, targets) = load_decision_tree_data();
/// assert_eq!(headers.len(), 2);
/// assert_eq!(features.shape(), &[200, 2]);
/// assert_eq!(targets.len(), 200);
/// ```
pub fn load_decision_tree_data() -> (
    &'static Array1<&'static str>,
    &'static Array2<f64>,
    &'static Array1<f64>,
) {
    let (headers, features, targets) =
        DECISION_TREE_DATA.get_or_init(load_decision_tree_data_internal);
    (headers, features, targets)
}

/// Loads the two-feature regression dataset and returns owned copies
///
/// # Returns
///
/// - `Array1<&'static str>` - Owned feature names
/// - `Array2<f64>` - Owned feature matrix with shape (200, 2)
/// - `Array1<f64>` - Owned targets
pub fn load_decision_tree_data_owned() -> (Array1<&'static str>, Array2<f64>, Array1<f64>) {
    let (headers, features, targets) = load_decision_tree_data();
    (headers.clone(), features.clone(), targets.clone())
}
