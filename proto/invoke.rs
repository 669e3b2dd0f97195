use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tonic::{Code, Status};

/// Failure of a call made through [`Invoke`].
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The method name is not one of the declared operations. Nothing was sent.
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Connection refused, deadline exceeded, server error and the like.
    #[error("transport failure: {0}")]
    Transport(Status),

    #[error("malformed payload: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("bridge host is gone")]
    Disconnected,
}

impl From<Status> for InvokeError {
    fn from(status: Status) -> Self {
        match status.code() {
            Code::NotFound => InvokeError::NotFound(status.message().to_owned()),
            _ => InvokeError::Transport(status),
        }
    }
}

/// Calls a remote operation by name with an opaque payload.
///
/// The only generic capability that crosses the bridge: a name and bytes in, bytes out.
#[async_trait]
pub trait Invoke: Send + Sync {
    async fn invoke(&self, method: &str, payload: Vec<u8>) -> Result<Vec<u8>, InvokeError>;
}

#[async_trait]
impl<T: Invoke + ?Sized> Invoke for Arc<T> {
    async fn invoke(&self, method: &str, payload: Vec<u8>) -> Result<Vec<u8>, InvokeError> {
        (**self).invoke(method, payload).await
    }
}
