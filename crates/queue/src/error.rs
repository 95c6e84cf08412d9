//! Dispatch error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("message attribute error: {0}")]
    Attribute(String),

    #[error("send error: {0}")]
    Send(String),

    #[error("timeout after {0}ms")]
    Timeout(u64),
}
