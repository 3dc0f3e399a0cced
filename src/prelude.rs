/// Prelude module for the tree learners and models.
#[cfg(feature = "machine_learning")]
pub mod machine_learning_prelude;
/// Prelude module for mathematical operations.
#[cfg(feature = "math")]
pub mod math_prelude;
/// Prelude module for evaluation metrics.
#[cfg(feature = "metric")]
pub mod metric_prelude;
/// Prelude module for the bundled datasets.
#[cfg(feature = "dataset")]
pub mod dataset_prelude;

#[cfg(feature = "dataset")]
pub use dataset_prelude::*;
#[cfg(feature = "machine_learning")]
pub use machine_learning_prelude::*;
#[cfg(feature = "math")]
pub use math_prelude::*;
#[cfg(feature = "metric")]
pub use metric_prelude::*;
