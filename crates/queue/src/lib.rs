pub mod error;
pub mod log;
pub mod sink;
pub mod sqs;

pub use error::DispatchError;
pub use log::LogSink;
pub use sink::{EventSink, QueueSink};
pub use sqs::SqsSink;
