use serde::Serialize;
use std::collections::BTreeMap;

use sprig_domain::subscription::SubscriptionPayload;

/// Wire shape of the API's `SubscriptionInput`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionInput {
    pub resource_type: String,
    pub trigger: String,
    pub selectors: Vec<SelectorInput>,
    pub regex_selectors: Vec<SelectorInput>,
    pub subscriber: SubscriberInput,
    pub owner_type: String,
    pub trigger_data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriberInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub target: String,
}

impl From<&SubscriptionPayload> for SubscriptionInput {
    fn from(payload: &SubscriptionPayload) -> Self {
        let resource_type = payload.resource_type();
        Self {
            resource_type: resource_type.as_str().to_string(),
            trigger: payload.trigger().as_str().to_string(),
            selectors: vec![
                SelectorInput {
                    kind: "object".to_string(),
                    data: resource_type.selector_data().to_string(),
                },
                SelectorInput {
                    kind: "id".to_string(),
                    data: payload.resource_id().as_str().to_string(),
                },
            ],
            regex_selectors: Vec::new(),
            subscriber: SubscriberInput {
                kind: payload.method().as_str().to_string(),
                target: payload.target().value().to_string(),
            },
            owner_type: "person".to_string(),
            trigger_data: payload.extra_fields().clone(),
        }
    }
}
