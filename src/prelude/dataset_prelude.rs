pub use crate::dataset::aptitude::{load_aptitude, load_aptitude_owned};
pub use crate::dataset::decision_tree_data::{
    load_decision_tree_data,
    load_decision_tree_data_owned
};
