use thiserror::Error;

/// Error types that can occur while configuring, training, or querying a tree model
///
/// # Variants
///
/// - `InputValidationError` - The data handed to a learner or model has the wrong shape or contains invalid values (empty data, length mismatch, NaN, out-of-range indices, bad weights)
/// - `ConfigurationError` - A learner was constructed with invalid hyper-parameters or without a required collaborator such as a loss function
/// - `TreeError` - Something is wrong with a tree structure or with how it is being queried
/// - `ProcessingError` - A failure while processing, e.g. a worker pool could not be created
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Input validation error: {0}")]
    InputValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Tree structure error: {0}")]
    TreeError(&'static str),
    #[error("Processing error: {0}")]
    ProcessingError(String),
}
