use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sprig_domain::events::subscription_events::SubscriptionSaved;
use sprig_domain::events::EventHandler;
use sprig_domain::shared::DomainError;

/// Reports "Add Notification" analytics events to the `sprig::analytics`
/// log target whenever a subscription submission finishes
#[derive(Clone, Default)]
pub struct AnalyticsEventHandler {
    sent: Arc<AtomicUsize>,
}

impl AnalyticsEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of analytics events sent so far
    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EventHandler<SubscriptionSaved> for AnalyticsEventHandler {
    async fn handle(&self, event: &SubscriptionSaved) -> Result<(), DomainError> {
        let extra_fields = serde_json::to_string(&event.extra_fields)
            .map_err(|e| DomainError::Serialization(e.to_string()))?;

        tracing::info!(
            target: "sprig::analytics",
            name = SubscriptionSaved::ANALYTICS_NAME,
            event_id = %event.event_id,
            resource_type = event.resource_type.as_str(),
            resource_id = %event.resource_id,
            trigger = event.trigger.as_str(),
            method = event.method.as_str(),
            extra_fields = %extra_fields,
            accepted = event.accepted,
            "{}",
            SubscriptionSaved::ANALYTICS_NAME
        );

        self.sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
