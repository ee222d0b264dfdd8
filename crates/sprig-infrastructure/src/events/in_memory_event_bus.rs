use async_trait::async_trait;
use log::{debug, error, info};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use sprig_domain::events::{DomainEvent, DynamicEventHandler, EventBus};
use sprig_domain::shared::DomainError;

/// In-memory event bus implementation
/// Dispatches to every subscribed handler in registration order before returning
pub struct InMemoryEventBus {
    handlers: Arc<RwLock<HashMap<&'static str, Vec<Arc<dyn DynamicEventHandler>>>>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Subscribe a handler under the event type it accepts
    pub async fn subscribe(&self, handler: Arc<dyn DynamicEventHandler>) {
        let event_type_name = handler.accepts();
        let mut handlers = self.handlers.write().await;

        handlers.entry(event_type_name).or_default().push(handler);

        info!("Subscribed handler for event type: {}", event_type_name);
    }

    /// Get the number of handlers for a specific event type
    pub async fn handler_count<E: DomainEvent + 'static>(&self) -> usize {
        let event_type_name = std::any::type_name::<E>();
        let handlers = self.handlers.read().await;
        handlers.get(event_type_name).map_or(0, |h| h.len())
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, event: Box<dyn DomainEvent>) -> Result<(), DomainError> {
        let event_type_name = event.event_type_name();
        debug!("Publishing event: {}", event_type_name);

        let handlers = self.handlers.read().await;

        let Some(event_handlers) = handlers.get(event_type_name) else {
            debug!("No handlers registered for event type: {}", event_type_name);
            return Ok(());
        };

        for handler in event_handlers {
            // A failing handler must not starve the others
            if let Err(e) = handler.handle_event(event.as_ref()).await {
                error!("Handler failed to process event {}: {}", event_type_name, e);
            }
        }

        Ok(())
    }
}
