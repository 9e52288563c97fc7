//! Broadcast notifier with SSE streaming.
//!
//! This module provides a `ChangeNotifier` that fans change events out over a
//! broadcast channel, and streams them to connected web clients as
//! server-sent events.

use std::convert::Infallible;
use std::sync::Arc;

use axum::response::sse::{Event, KeepAlive, Sse};
use confhub_core::{ChangeNotifier, NotifierError, ParameterChangeEvent};
use futures_util::stream::Stream;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_util::sync::CancellationToken;

/// SSE event name used for every change notification.
pub const CHANGE_EVENT_NAME: &str = "parameters-changed";

/// Notifier that broadcasts change events to every subscriber.
///
/// Publishing never blocks. Slow subscribers may miss events if the buffer
/// overflows, and having no subscriber at all is not an error. Open SSE
/// streams end once [`BroadcastNotifier::shutdown`] is called.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<ParameterChangeEvent>,
    shutdown: CancellationToken,
}

impl BroadcastNotifier {
    /// Create a notifier buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            shutdown: CancellationToken::new(),
        }
    }

    /// Create a notifier with the default capacity (256 events).
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(256)
    }

    /// Raw receiver for in-process consumers.
    pub fn receiver(&self) -> broadcast::Receiver<ParameterChangeEvent> {
        self.sender.subscribe()
    }

    /// Create an SSE stream for a new client connection.
    ///
    /// When `user_id` is given, only events for that user are streamed.
    /// Includes a keep-alive ping every 30 seconds to prevent proxy timeouts.
    /// The stream ends when the notifier is shut down.
    pub fn subscribe(
        self: Arc<Self>,
        user_id: Option<String>,
    ) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
        let receiver = self.receiver();
        let stream = BroadcastStream::new(receiver).filter_map(move |result| {
            let event = match result {
                Ok(event) => event,
                Err(e) => {
                    // Lagged receivers skip ahead and keep streaming
                    tracing::debug!("SSE stream error: {}", e);
                    return None;
                }
            };

            if user_id.as_ref().is_some_and(|user| *user != event.user_id) {
                return None;
            }

            match serde_json::to_string(&event) {
                Ok(json) => Some(Ok(Event::default().event(CHANGE_EVENT_NAME).data(json))),
                Err(e) => {
                    tracing::warn!("Failed to serialize change event: {}", e);
                    None
                }
            }
        });

        let token = self.shutdown.clone();
        let stream = futures_util::StreamExt::take_until(stream, async move {
            token.cancelled().await;
        });

        Sse::new(stream).keep_alive(
            KeepAlive::new()
                .interval(std::time::Duration::from_secs(30))
                .text("ping"),
        )
    }

    /// End every open SSE stream, current and future.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ChangeNotifier for BroadcastNotifier {
    fn publish(&self, event: ParameterChangeEvent) -> Result<(), NotifierError> {
        tracing::debug!(
            target: "confhub.notifications",
            headers = ?event.headers(),
            "Broadcasting change event"
        );
        // A send error only means nobody is listening right now
        let _ = self.sender.send(event);
        Ok(())
    }
}
