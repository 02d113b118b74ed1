#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl ReadError {
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ReadError::Storage(storage) => storage.server_message(),
            ReadError::NotFound | ReadError::Other(_) => None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<UpdateError> for CreateError {
    fn from(value: UpdateError) -> Self {
        match value {
            UpdateError::Conflict => CreateError::Conflict,
            UpdateError::Storage(storage) => CreateError::Storage(storage),
            UpdateError::Other(other) => CreateError::Other(other),
        }
    }
}

impl CreateError {
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            CreateError::Storage(storage) => storage.server_message(),
            CreateError::Conflict | CreateError::Other(_) => None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum DeleteError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error("no session")]
    NoSession,
    #[error("{}", .message.as_deref().unwrap_or("request rejected"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl StorageError {
    /// The message the server attached to a rejected request.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            StorageError::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}
