/// This module provides access to the raw data of the aptitude dataset
pub mod aptitude_raw;
/// This module provides access to the raw data of the decision tree regression dataset
pub mod decision_tree_data_raw;

pub use aptitude_raw::*;
pub use decision_tree_data_raw::*;
