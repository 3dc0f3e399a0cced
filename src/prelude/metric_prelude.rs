pub use crate::metric::{accuracy, classification_error, mean_squared_error};
