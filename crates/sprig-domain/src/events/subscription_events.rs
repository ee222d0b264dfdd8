use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;

use crate::events::DomainEvent;
use crate::shared::{EventId, ResourceId};
use crate::subscription::{MethodId, ResourceType, SubscriptionPayload, TriggerId};

/// Macro to implement DomainEvent trait with type name
macro_rules! impl_domain_event {
    ($type:ty) => {
        impl DomainEvent for $type {
            fn as_any(&self) -> &(dyn Any + Send + Sync) {
                self
            }

            fn event_type_name(&self) -> &'static str {
                std::any::type_name::<Self>()
            }
        }
    };
}

/// Fired once a subscription has been handed to the subscription API.
/// Analytics listens for this as the "Add Notification" event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionSaved {
    pub event_id: EventId,
    pub resource_type: ResourceType,
    pub resource_id: ResourceId,
    pub trigger: TriggerId,
    pub method: MethodId,
    pub extra_fields: BTreeMap<String, String>,
    pub accepted: bool,
    pub occurred_at: DateTime<Utc>,
}

impl SubscriptionSaved {
    pub const ANALYTICS_NAME: &'static str = "Add Notification";

    pub fn from_payload(payload: &SubscriptionPayload, accepted: bool) -> Self {
        Self {
            event_id: EventId::new(),
            resource_type: payload.resource_type(),
            resource_id: payload.resource_id().clone(),
            trigger: payload.trigger().clone(),
            method: payload.method(),
            extra_fields: payload.extra_fields().clone(),
            accepted,
            occurred_at: Utc::now(),
        }
    }
}

impl_domain_event!(SubscriptionSaved);

/// Fired when a configuration session is closed without submitting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionDraftDiscarded {
    pub resource_type: ResourceType,
    pub resource_id: ResourceId,
    pub occurred_at: DateTime<Utc>,
}

impl_domain_event!(SubscriptionDraftDiscarded);
