pub mod config;
pub mod credentials;
pub mod error;
pub mod event;

pub use config::Config;
pub use credentials::CredentialSet;
pub use error::ValidationError;
pub use event::{Event, RawEvent, DEFAULT_SOURCE, MAX_BATCH_SIZE, UNKNOWN_ACCOUNT};
