mod catalog;
mod draft;
mod gateway;
mod payload;
mod target;
mod validator;
mod value_objects;

pub use catalog::{ExtraField, SubscriptionCatalog, SubscriptionMethodControl, Trigger};
pub use draft::{FieldRef, SubscriptionDraft, ValidationFailure};
pub use gateway::SubscriptionGateway;
pub use payload::SubscriptionPayload;
pub use target::DeliveryTarget;
pub use validator::Validator;
pub use value_objects::{MethodId, ResourceType, TriggerId};
