use async_trait::async_trait;
use log::info;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use sprig_domain::shared::DomainError;
use sprig_domain::subscription::{SubscriptionGateway, SubscriptionPayload};

use super::input::SubscriptionInput;
use crate::graphql::GraphqlClient;

pub const SAVE_SUBSCRIPTION: &str = r#"mutation SaveSubscription($subscription: SubscriptionInput!) {
  saveSubscription(subscription: $subscription)
}"#;

#[derive(Debug, Deserialize)]
struct SaveSubscriptionData {
    #[serde(rename = "saveSubscription")]
    save_subscription: bool,
}

/// Subscription gateway backed by the `saveSubscription` mutation
pub struct GraphqlSubscriptionGateway {
    client: Arc<GraphqlClient>,
}

impl GraphqlSubscriptionGateway {
    pub fn new(client: Arc<GraphqlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubscriptionGateway for GraphqlSubscriptionGateway {
    async fn save_subscription(&self, payload: &SubscriptionPayload) -> Result<(), DomainError> {
        let input = SubscriptionInput::from(payload);
        info!(
            "Saving subscription: {} {} on {} via {}",
            input.resource_type, payload.resource_id(), input.trigger, input.subscriber.kind
        );

        let data: SaveSubscriptionData = self
            .client
            .execute(
                "SaveSubscription",
                SAVE_SUBSCRIPTION,
                json!({ "subscription": input }),
            )
            .await?;

        if !data.save_subscription {
            return Err(DomainError::Infrastructure(
                "Subscription was not saved".to_string(),
            ));
        }

        Ok(())
    }
}
