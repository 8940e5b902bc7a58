use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("archive directory is not set")]
    MissingArchiveDir,
    #[error("background task failed: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(value: tokio::task::JoinError) -> Self {
        EngineError::Join(value.to_string())
    }
}
