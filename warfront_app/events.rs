use async_trait::async_trait;
use std::sync::Mutex;
use tracing::{error, info};

use warfront_game::events::ResolutionEvent;
use warfront_types::errors::ApplicationError;

/// Receives resolution events once the transaction that produced them has
/// committed. Delivery is fire-and-forget from the engine's point of view.
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    async fn dispatch(&self, event: &ResolutionEvent) -> Result<(), ApplicationError>;
}

/// Events collected by a job handler while its transaction is open.
#[derive(Debug, Default)]
pub struct EventOutbox {
    events: Mutex<Vec<ResolutionEvent>>,
}

impl EventOutbox {
    pub fn push(&self, event: ResolutionEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }

    /// Drains the outbox.
    pub fn take(&self) -> Vec<ResolutionEvent> {
        std::mem::take(
            &mut *self
                .events
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writes every event to the log. Used when no notification service is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventDispatcher;

#[async_trait]
impl EventDispatcher for TracingEventDispatcher {
    async fn dispatch(&self, event: &ResolutionEvent) -> Result<(), ApplicationError> {
        let payload = serde_json::to_string(event)?;
        info!(
            event = event.name(),
            recipient = %event.recipient(),
            payload = %payload,
            "Resolution event"
        );
        Ok(())
    }
}

/// Hands every event to the dispatcher. Failures are logged and never
/// propagated: the resolution they belong to is already committed.
pub async fn dispatch_events(dispatcher: &dyn EventDispatcher, events: Vec<ResolutionEvent>) {
    for event in events {
        if let Err(e) = dispatcher.dispatch(&event).await {
            error!(
                event = event.name(),
                recipient = %event.recipient(),
                error = %e,
                "Failed to dispatch resolution event"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::tests::RecordingEventDispatcher;
    use uuid::Uuid;
    use warfront_types::common::Resources;

    fn returned(player_id: Uuid) -> ResolutionEvent {
        ResolutionEvent::ArmyReturned {
            attack_id: Uuid::new_v4(),
            player_id,
            city_id: Uuid::new_v4(),
            loot: Resources::new(1, 2, 3),
        }
    }

    #[test]
    fn test_outbox_take_drains() {
        let outbox = EventOutbox::default();
        outbox.push(returned(Uuid::new_v4()));
        outbox.push(returned(Uuid::new_v4()));
        assert_eq!(outbox.len(), 2);

        assert_eq!(outbox.take().len(), 2);
        assert!(outbox.is_empty());
    }

    #[tokio::test]
    async fn test_failing_dispatcher_does_not_stop_delivery() {
        let dispatcher = RecordingEventDispatcher::failing_for("army_returned");
        let player = Uuid::new_v4();

        dispatch_events(&dispatcher, vec![returned(player), returned(player)]).await;

        assert_eq!(dispatcher.attempts(), 2);
        assert!(dispatcher.events().is_empty());
    }

    #[tokio::test]
    async fn test_tracing_dispatcher_accepts_every_event() {
        let dispatcher = TracingEventDispatcher;
        assert!(dispatcher.dispatch(&returned(Uuid::new_v4())).await.is_ok());
    }
}
