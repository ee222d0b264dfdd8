// Domain layer - Pure business logic
// No dependencies on infrastructure or presentation layers

pub mod events;
pub mod shared;
pub mod subscription;

// Re-exports for convenience
pub use events::DomainEvent;
pub use shared::{DomainError, ResourceId, SessionId};
