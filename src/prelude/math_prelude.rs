pub use crate::math::{entropy, gini, sample_variance, variance};
pub use crate::math::{median, sigmoid};
