use std::any::Any;

pub mod event_bus;
pub mod subscription_events;

pub use event_bus::{DynamicEventHandler, EventBus, EventHandler, EventSubscription};

/// Base trait for all domain events
/// All events must be Send + Sync so the bus can hand them across tasks
pub trait DomainEvent: Send + Sync + Any {
    /// Convert to Any for type-safe downcasting
    fn as_any(&self) -> &(dyn Any + Send + Sync);

    /// Fully qualified type name, used as the routing key on the bus
    fn event_type_name(&self) -> &'static str;
}
