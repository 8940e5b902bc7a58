use archive_purge_engine::RemoteError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NexusError {
    #[error("invalid nexus url: {0}")]
    InvalidUrl(String),
    #[error("nexus repository name is empty")]
    MissingRepository,
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

pub(crate) fn from_reqwest(err: reqwest::Error) -> RemoteError {
    if let Some(status) = err.status() {
        return from_status(status, err.to_string());
    }
    RemoteError::Transport(err.to_string())
}

pub(crate) fn from_status(status: StatusCode, message: String) -> RemoteError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Auth(message),
        other => RemoteError::Status {
            status: other.as_u16(),
            message,
        },
    }
}

impl From<NexusError> for RemoteError {
    fn from(value: NexusError) -> Self {
        RemoteError::Invalid(value.to_string())
    }
}
