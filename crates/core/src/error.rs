//! Validation error types.

use thiserror::Error;

use crate::event::MAX_BATCH_SIZE;

/// Request validation failures. All of these are user visible as 400
/// responses and are detected before any enrichment or dispatch work.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("event_name is required and must be a string")]
    MissingEventName,

    #[error("events must be a non-empty array")]
    InvalidBatchShape,

    #[error("maximum {} events per batch", MAX_BATCH_SIZE)]
    BatchTooLarge,

    #[error("{0} events missing event_name")]
    InvalidMembers(usize),
}
