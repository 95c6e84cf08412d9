use std::sync::Arc;

use funnel_core::CredentialSet;
use funnel_queue::EventSink;

/// Shared application state. Read-only after initialization, so handlers
/// take it behind a plain `Arc` with no locking.
pub struct AppState {
    pub credentials: CredentialSet,
    /// The sink variant selected at startup. Held as a trait object so
    /// tests can substitute recording or failing sinks.
    pub sink: Arc<dyn EventSink>,
    /// Name of the selected sink variant, surfaced by /health.
    pub sink_provider: &'static str,
}
