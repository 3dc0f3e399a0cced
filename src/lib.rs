/// Error type shared by every learner, model and helper in this crate.
pub mod error;

pub use error::ModelError;

/// A macro that generates a getter method for any field.
///
/// This macro creates a public getter method that returns the value of the
/// specified field. The generated method includes appropriate documentation
/// describing the field being accessed.
///
/// # Parameters
///
/// - `$method_name` - The name of the getter method (e.g., get_maximum_tree_depth)
/// - `$field_name` - The name of the field to access (e.g., maximum_tree_depth)
/// - `$return_type` - The return type of the getter method
///
/// # Generated Method
///
/// The macro generates a method that returns the field value,
/// with documentation that describes what field is being accessed.
#[cfg(feature = "machine_learning")]
macro_rules! get_field {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!("* `", stringify!($return_type), "` - The value of the `", stringify!($field_name), "` field")]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name
        }
    };
}

/// A macro that generates a public getter method returning a reference to a field.
///
/// This macro creates a method that provides immutable reference access to a private field
/// in a struct, following the Rust convention of getter methods.
///
/// # Parameters
///
/// - `$method_name` - The identifier for the generated getter method name
/// - `$field_name` - The identifier of the struct field to access
/// - `$return_type` - The type expression for the return value (typically a reference type like `&[f64]`)
///
/// # Generated Method
///
/// The macro generates a method that returns the field value as a reference,
/// with documentation that describes what field is being accessed
#[cfg(feature = "machine_learning")]
macro_rules! get_field_as_ref {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!("* `", stringify!($return_type), "` - The value of the `", stringify!($field_name), "` field as a reference")]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name.as_ref()
        }
    };
}

/// Module `math` contains the statistical primitives the tree learners are built on.
///
/// # Core Functions
///
/// ## Impurity Measures
/// - `gini` - Gini impurity of a label set, used by CART classification
/// - `entropy` - Shannon entropy (bits) of a label set
/// - `sample_variance` - Single-pass unbiased variance, used by CART regression
/// - `variance` - Population variance
///
/// ## Loss Helpers
/// - `median` - Median of a set of values, used by the absolute gradient boosting loss
/// - `sigmoid` - Logistic function, used by the binomial gradient boosting loss
///
/// # Example
/// ```rust
/// use rustytrees::math::{entropy, gini, sigmoid};
/// use ndarray::array;
///
/// let labels = array![0.0, 1.0, 1.0, 0.0];
/// let ent = entropy(&labels);
/// let gini_val = gini(&labels);
/// assert!((ent - 1.0).abs() < 1e-12);
/// assert!((gini_val - 0.5).abs() < 1e-12);
///
/// let activated = sigmoid(0.5);
/// assert!(activated > 0.5);
/// ```
#[cfg(feature = "math")]
pub mod math;

/// Module `machine_learning` provides the decision-tree induction core.
///
/// # Building Blocks
/// - **Interval**: Half-open `[from, to)` range over a working index array
/// - **Impurity metrics**: Gini, entropy and sample variance evaluated over an interval
/// - **Impurity calculators**: Incremental Gini and variance bookkeeping for moving split boundaries
/// - **Split searchers**: Exhaustive linear scan and the bisecting binary heuristic
///
/// # Learners
/// - **CartLearner**: Depth-first CART for classification and regression
/// - **DecisionTreeLearner**: Queue-based learner with feature sub-sampling and sample weights
/// - **GbmDecisionTreeLearner**: Gradient boosting tree builder, parallel across features
/// - **RegressionGradientBoostLearner** / **ClassificationGradientBoostLearner**: Stage-wise boosting
///
/// # Models
/// - **BinaryTree**: Flat node array with single, batch and indexed prediction
/// - **GbmTree**: Flat node array produced by the gradient boosting builder
///
/// # Examples
/// ```rust
/// use rustytrees::machine_learning::*;
/// use ndarray::array;
///
/// let x = array![[1.0], [2.0], [3.0], [4.0]];
/// let y = array![0.0, 0.0, 1.0, 1.0];
///
/// let learner = CartLearner::classification(1, 10, 0.001).unwrap();
/// let tree = learner.learn(x.view(), y.view()).unwrap();
/// assert_eq!(tree.predict_one(&[1.5]).unwrap(), 0.0);
/// assert_eq!(tree.predict_one(&[3.5]).unwrap(), 1.0);
/// ```
#[cfg(feature = "machine_learning")]
pub mod machine_learning;

/// A convenience module that re-exports the most commonly used types and traits from this crate.
///
/// # Examples
/// ```rust
/// use rustytrees::prelude::*;
///
/// let searcher = LinearSplitSearcher::new(1).unwrap();
/// assert_eq!(searcher.get_minimum_split_size(), 1);
/// ```
pub mod prelude;

/// Evaluation metrics for tree models.
///
/// # Regression Metrics
/// - **mean_squared_error**: Average of squared differences between predicted and actual values
///
/// # Classification Metrics
/// - **classification_error**: Fraction of misclassified observations
/// - **accuracy**: Fraction of correctly classified observations
///
/// # Examples
/// ```rust
/// use rustytrees::metric::*;
/// use ndarray::array;
///
/// let predictions = array![3.0, 2.0, 3.5, 4.0];
/// let actuals = array![3.0, 2.0, 3.0, 4.0];
/// let mse = mean_squared_error(&actuals, &predictions);
/// assert!((mse - 0.0625).abs() < 1e-12);
/// ```
#[cfg(feature = "metric")]
pub mod metric;

/// Bundled fixtures for exercising the tree learners.
///
/// # Available Datasets
/// - **aptitude**: 26 observations, 2 features, binary pass/fail target
/// - **decision_tree_data**: 200 observations, 2 features, continuous target
///
/// # Data Format
/// All datasets return tuples in the format `(headers, data, target)` where:
/// - `headers`: Feature names
/// - `data`: 2D ndarray with samples as rows and features as columns
/// - `target`: 1D ndarray with target values or class labels
///
/// # Examples
/// ```rust
/// use rustytrees::dataset::aptitude;
///
/// let (headers, data, target) = aptitude::load_aptitude();
/// assert_eq!(headers.len(), 2);
/// assert_eq!(data.shape(), &[26, 2]);
/// assert_eq!(target.len(), 26);
/// ```
#[cfg(feature = "dataset")]
pub mod dataset;
