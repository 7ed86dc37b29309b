//! Structured logging of community events.
//!
//! [`EventLogger`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! records every event through `tracing`. It stops when the bus is dropped
//! or its cancellation token fires.

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::bus::CommunityEvent;

pub struct EventLogger;

impl EventLogger {
    /// Run the logging loop. Returns the number of events logged.
    pub async fn run(
        mut receiver: broadcast::Receiver<CommunityEvent>,
        cancel: CancellationToken,
    ) -> u64 {
        let mut logged = 0;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(logged, "Event logger stopping");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => {
                        Self::log(&event);
                        logged += 1;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event logger lagged, some events were not logged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!(logged, "Event bus closed, event logger shutting down");
                        break;
                    }
                },
            }
        }
        logged
    }

    fn log(event: &CommunityEvent) {
        tracing::info!(
            event_type = %event.event_type,
            source_entity_type = event.source_entity_type.as_deref(),
            source_entity_id = event.source_entity_id,
            actor_user_id = event.actor_user_id,
            payload = %event.payload,
            "Community event"
        );
    }
}
