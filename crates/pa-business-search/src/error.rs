use filing_common::error::CommonError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("config error: {0}")]
    Config(String),
}
