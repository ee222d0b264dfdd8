use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

use super::DomainEvent;
use crate::shared::DomainError;

/// Publishes subscription events to whoever subscribed to their type
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, event: Box<dyn DomainEvent>) -> Result<(), DomainError>;
}

/// Reacts to one concrete event type
#[async_trait]
pub trait EventHandler<E: DomainEvent>: Send + Sync {
    async fn handle(&self, event: &E) -> Result<(), DomainError>;
}

/// Handler as stored by a bus, keyed by the event type it accepts.
///
/// `accepts` is compared against `DomainEvent::event_type_name`, so a bus
/// only ever hands a handler the events it was registered for.
#[async_trait]
pub trait DynamicEventHandler: Send + Sync {
    fn accepts(&self) -> &'static str;

    async fn handle_event(&self, event: &dyn DomainEvent) -> Result<(), DomainError>;
}

/// Binds an `EventHandler<E>` to the routing key of `E`
pub struct EventSubscription<E, H> {
    handler: H,
    _event: PhantomData<fn(E)>,
}

impl<E, H> EventSubscription<E, H>
where
    E: DomainEvent + 'static,
    H: EventHandler<E> + 'static,
{
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _event: PhantomData,
        }
    }

    pub fn boxed(handler: H) -> Arc<dyn DynamicEventHandler> {
        Arc::new(Self::new(handler))
    }
}

#[async_trait]
impl<E, H> DynamicEventHandler for EventSubscription<E, H>
where
    E: DomainEvent + 'static,
    H: EventHandler<E> + 'static,
{
    fn accepts(&self) -> &'static str {
        std::any::type_name::<E>()
    }

    async fn handle_event(&self, event: &dyn DomainEvent) -> Result<(), DomainError> {
        // Events routed under another key are not ours
        match event.as_any().downcast_ref::<E>() {
            Some(event) => self.handler.handle(event).await,
            None => Ok(()),
        }
    }
}
