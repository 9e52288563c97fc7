//! Change notifier trait for publishing parameter change events.
//!
//! Implementations handle transport details (broadcast channels, SSE,
//! message brokers). Connection lifecycle belongs to the adapter that builds
//! the notifier, never to the core.

use thiserror::Error;

use crate::events::ParameterChangeEvent;

/// Failure to hand an event over to the transport.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The transport is not accepting events.
    #[error("Notifier unavailable: {0}")]
    Unavailable(String),
}

/// Trait for publishing parameter change events.
///
/// Publishing is fire-and-forget: the call returns once the transport has
/// accepted the event and must not block on delivery.
///
/// # Implementations
///
/// - `NoopNotifier` - For tests and contexts without listeners
/// - Adapter-specific implementations (broadcast channel + SSE, etc.)
pub trait ChangeNotifier: Send + Sync {
    /// Publish one change event.
    fn publish(&self, event: ParameterChangeEvent) -> Result<(), NotifierError>;
}

/// A notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl NoopNotifier {
    /// Create a new no-op notifier.
    pub const fn new() -> Self {
        Self
    }
}

impl ChangeNotifier for NoopNotifier {
    fn publish(&self, _event: ParameterChangeEvent) -> Result<(), NotifierError> {
        Ok(())
    }
}
