// Infrastructure layer - Technical implementations
// Depends on domain layer, implements its interfaces

pub mod config;
pub mod events;
pub mod graphql;
pub mod logging;
pub mod subscription;
