use super::raw_data::aptitude_raw::load_aptitude_raw_data;
use ndarray::{Array1, Array2};
use std::sync::OnceLock;

const APTITUDE_ROWS: usize = 26;
const APTITUDE_FEATURES: usize = 2;

static APTITUDE_DATA: OnceLock<(Array1<&'static str>, Array2<f64>, Array1<f64>)> =
    OnceLock::new();

/// Parses the embedded aptitude table.
///
/// The last column (`Pass`) becomes the target; the header of that column is not
/// part of the returned feature names.
///
/// # Panics
///
/// This function will panic if the embedded table is malformed, which would be a
/// packaging error rather than a runtime condition.
fn load_aptitude_internal() -> (Array1<&'static str>, Array2<f64>, Array1<f64>) {
    let raw_data = load_aptitude_raw_data();
    let mut lines = raw_data.trim().lines();

    let header_line = lines.next().unwrap();
    let headers = header_line
        .split(';')
        .take(APTITUDE_FEATURES)
        .collect::<Vec<&str>>();

    let mut features = Vec::with_capacity(APTITUDE_ROWS * APTITUDE_FEATURES);
    let mut targets = Vec::with_capacity(APTITUDE_ROWS);

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let cols: Vec<&str> = line.split(';').collect();
        for col in cols.iter().take(APTITUDE_FEATURES) {
            features.push(col.trim().parse::<f64>().unwrap());
        }
        targets.push(cols[APTITUDE_FEATURES].trim().parse::<f64>().unwrap());
    }

    let headers_array = Array1::from_vec(headers);
    let features_array =
        Array2::from_shape_vec((APTITUDE_ROWS, APTITUDE_FEATURES), features).unwrap();
    let targets_array = Array1::from_vec(targets);

    (headers_array, features_array, targets_array)
}

/// Loads the aptitude dataset
///
/// 26 candidates described by an aptitude test score and months of previous
/// experience, labelled with whether they passed (1.0) or failed (0.0).
///
/// # Returns
///
/// - `&'static Array1<&'static str>` - Feature names: `AptitudeTestScore`, `PreviousExperience_month`
/// - `&'static Array2<f64>` - Feature matrix with shape (26, 2)
/// - `&'static Array1<f64>` - Pass/fail class codes
///
/// # Examples
/// ```rust
/// use rustytrees::dataset::aptitude::load_aptitude;
///
/// let (headers, features, targets) = load_aptitude();
/// assert_eq!(headers[0], "AptitudeTestScore");
/// assert_eq!(features.shape(), &[26, 2]);
/// assert_eq!(targets.len(), 26);
/// ```
pub fn load_aptitude() -> (
    &'static Array1<&'static str>,
    &'static Array2<f64>,
    &'static Array1<f64>,
) {
    let (headers, features, targets) = APTITUDE_DATA.get_or_init(load_aptitude_internal);
    (headers, features, targets)
}

/// Loads the aptitude dataset and returns owned copies
///
/// For read-only access, prefer `load_aptitude()` which returns references.
///
/// # Returns
///
/// - `Array1<&'static str>` - Owned feature names
/// - `Array2<f64>` - Owned feature matrix with shape (26, 2)
/// - `Array1<f64>` - Owned pass/fail class codes
pub fn load_aptitude_owned() -> (Array1<&'static str>, Array2<f64>, Array1<f64>) {
    let (headers, features, targets) = load_aptitude();
    (headers.clone(), features.clone(), targets.clone())
}
