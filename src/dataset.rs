/// This module provides access to the aptitude dataset
pub mod aptitude;
/// This module provides access to the two-feature regression dataset used to exercise tree learners
pub mod decision_tree_data;
/// Internal module for raw dataset content
mod raw_data;
