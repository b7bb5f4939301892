use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid choice: {0:?}")]
    InvalidChoice(String),
    #[error("persistence error: {0}")]
    Persistence(String),
}
