use async_trait::async_trait;

use super::payload::SubscriptionPayload;
use crate::shared::DomainError;

/// Remote subscription-creation API.
/// Implementations own the wire encoding; the draft only guarantees the payload shape.
#[async_trait]
pub trait SubscriptionGateway: Send + Sync {
    /// Submit a subscription, one request, no local retry state
    async fn save_subscription(&self, payload: &SubscriptionPayload) -> Result<(), DomainError>;
}
