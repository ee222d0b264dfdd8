use serde::Serialize;
use specta::Type;
use std::collections::BTreeMap;

use super::target::DeliveryTarget;
use super::value_objects::{MethodId, ResourceType, TriggerId};
use crate::shared::ResourceId;

/// Submission-ready subscription request.
///
/// Only a valid draft can produce one, and nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Type)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPayload {
    pub(super) resource_type: ResourceType,
    pub(super) resource_id: ResourceId,
    pub(super) trigger: TriggerId,
    pub(super) extra_fields: BTreeMap<String, String>,
    pub(super) method: MethodId,
    pub(super) target: DeliveryTarget,
}

impl SubscriptionPayload {
    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn resource_id(&self) -> &ResourceId {
        &self.resource_id
    }

    pub fn trigger(&self) -> &TriggerId {
        &self.trigger
    }

    pub fn extra_fields(&self) -> &BTreeMap<String, String> {
        &self.extra_fields
    }

    pub fn method(&self) -> MethodId {
        self.method
    }

    pub fn target(&self) -> &DeliveryTarget {
        &self.target
    }
}
