use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Please enter at least one URL")]
    EmptyBatch,

    #[error("Conversion failed: {0}")]
    Conversion(String),
}
