use proto::InvokeError;
use thiserror::Error;

use crate::ContentHash;

#[derive(Debug, Error)]
pub enum DriveError {
    /// A precondition was violated, e.g. records from more than one container.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("object {hash} has unsupported kind `{kind}`")]
    UnsupportedObjectKind { hash: ContentHash, kind: &'static str },

    /// A lookup missed, or a record came back without its object.
    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Invoke(InvokeError),
}

impl From<InvokeError> for DriveError {
    fn from(err: InvokeError) -> Self {
        match err {
            InvokeError::NotFound(what) => DriveError::NotFound(what),
            err => DriveError::Invoke(err),
        }
    }
}
