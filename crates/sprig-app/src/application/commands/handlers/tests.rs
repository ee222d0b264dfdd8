use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::commands::command_handler::{Command, CommandHandler};
use crate::application::commands::handlers::*;
use crate::application::commands::subscription_commands::*;
use crate::application::dtos::{BannerKind, DraftEdit};
use crate::application::services::SubscriptionSessionService;
use sprig_domain::events::{DomainEvent, EventBus};
use sprig_domain::shared::DomainError;
use sprig_domain::subscription::{SubscriptionGateway, SubscriptionPayload};

// Mock gateway and event bus for testing

struct MockSubscriptionGateway {
    saved: tokio::sync::RwLock<Vec<SubscriptionPayload>>,
    fail_with: Option<String>,
}

impl MockSubscriptionGateway {
    fn new() -> Self {
        Self {
            saved: tokio::sync::RwLock::new(Vec::new()),
            fail_with: None,
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            saved: tokio::sync::RwLock::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    async fn saved_count(&self) -> usize {
        self.saved.read().await.len()
    }
}

#[async_trait::async_trait]
impl SubscriptionGateway for MockSubscriptionGateway {
    async fn save_subscription(&self, payload: &SubscriptionPayload) -> Result<(), DomainError> {
        if let Some(message) = &self.fail_with {
            return Err(DomainError::Network(message.clone()));
        }
        self.saved.write().await.push(payload.clone());
        Ok(())
    }
}

struct MockEventBus {
    event_count: tokio::sync::RwLock<usize>,
}

impl MockEventBus {
    fn new() -> Self {
        Self {
            event_count: tokio::sync::RwLock::new(0),
        }
    }

    async fn get_event_count(&self) -> usize {
        *self.event_count.read().await
    }
}

#[async_trait::async_trait]
impl EventBus for MockEventBus {
    async fn publish(&self, _event: Box<dyn DomainEvent>) -> Result<(), DomainError> {
        let mut count = self.event_count.write().await;
        *count += 1;
        Ok(())
    }
}

fn setup(
    gateway: MockSubscriptionGateway,
) -> (
    Arc<SubscriptionSessionService>,
    Arc<MockSubscriptionGateway>,
    Arc<MockEventBus>,
) {
    let gateway = Arc::new(gateway);
    let event_bus = Arc::new(MockEventBus::new());
    let service = Arc::new(SubscriptionSessionService::new(
        gateway.clone(),
        event_bus.clone(),
    ));
    (service, gateway, event_bus)
}

fn save_command() -> SaveSubscriptionCommand {
    let mut extra_fields = BTreeMap::new();
    extra_fields.insert("task-duration-secs".to_string(), "120".to_string());

    SaveSubscriptionCommand {
        resource_type: "task".to_string(),
        resource_id: "task_1".to_string(),
        trigger_id: "exceeds-duration".to_string(),
        extra_fields,
        method_id: "email".to_string(),
        target: "a@b.com".to_string(),
    }
}

// Tests

#[test]
fn test_command_names() {
    assert_eq!(SubmitSubscriptionCommand::NAME, "submit_subscription");
    assert_eq!(SaveSubscriptionCommand::NAME, "save_subscription");
}

#[tokio::test]
async fn test_session_round_trip_through_handlers() {
    let (service, gateway, event_bus) = setup(MockSubscriptionGateway::new());

    let view = OpenSubscriptionSessionHandler::new(service.clone())
        .handle(OpenSubscriptionSessionCommand {
            resource_type: "VERSION".to_string(),
            resource_id: "v_42".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(view.triggers.len(), 3);

    let edit = EditSubscriptionDraftHandler::new(service.clone());
    edit.handle(EditSubscriptionDraftCommand {
        session_id: view.session_id.clone(),
        edit: DraftEdit::SelectMethod {
            method_id: "slack".to_string(),
        },
    })
    .await
    .unwrap();
    let view = edit
        .handle(EditSubscriptionDraftCommand {
            session_id: view.session_id.clone(),
            edit: DraftEdit::SetTargetValue {
                value: "@release-team".to_string(),
            },
        })
        .await
        .unwrap();
    assert!(view.is_valid);

    let banner = SubmitSubscriptionHandler::new(service.clone())
        .handle(SubmitSubscriptionCommand {
            session_id: view.session_id,
        })
        .await
        .unwrap();

    assert!(banner.is_success());
    assert_eq!(gateway.saved_count().await, 1);
    assert_eq!(event_bus.get_event_count().await, 1);
    assert_eq!(service.open_session_count().await, 0);
}

#[tokio::test]
async fn test_open_with_unknown_resource_type_fails() {
    let (service, _, _) = setup(MockSubscriptionGateway::new());

    let result = OpenSubscriptionSessionHandler::new(service)
        .execute(OpenSubscriptionSessionCommand {
            resource_type: "build".to_string(),
            resource_id: "b_1".to_string(),
        })
        .await;

    assert!(matches!(result, Err(DomainError::InvalidInput(_))));
}

#[tokio::test]
async fn test_cancel_session_handler() {
    let (service, gateway, event_bus) = setup(MockSubscriptionGateway::new());
    let view = service
        .open(sprig_domain::subscription::ResourceType::Task, "task_1")
        .await
        .unwrap();

    CancelSubscriptionSessionHandler::new(service.clone())
        .handle(CancelSubscriptionSessionCommand {
            session_id: view.session_id.clone(),
        })
        .await
        .unwrap();

    assert_eq!(service.open_session_count().await, 0);
    assert_eq!(gateway.saved_count().await, 0);
    assert_eq!(event_bus.get_event_count().await, 1);

    // Already closed
    let result = CancelSubscriptionSessionHandler::new(service)
        .handle(CancelSubscriptionSessionCommand {
            session_id: view.session_id,
        })
        .await;
    assert!(matches!(result, Err(DomainError::SessionNotFound(_))));
}

#[tokio::test]
async fn test_save_subscription_handler() {
    let (service, gateway, event_bus) = setup(MockSubscriptionGateway::new());
    let handler = SaveSubscriptionHandler::new(service);

    let banner = handler.handle(save_command()).await.unwrap();
    assert_eq!(banner.message, "Your subscription has been added");

    let saved = gateway.saved.read().await;
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].trigger().as_str(), "exceeds-duration");
    assert_eq!(
        saved[0].extra_fields().get("task-duration-secs").map(String::as_str),
        Some("120")
    );
    assert_eq!(saved[0].target().value(), "a@b.com");
    assert_eq!(event_bus.get_event_count().await, 1);
}

#[tokio::test]
async fn test_save_subscription_with_invalid_target_fails() {
    let (service, gateway, event_bus) = setup(MockSubscriptionGateway::new());
    let handler = SaveSubscriptionHandler::new(service);

    let mut command = save_command();
    command.target = "not-an-email".to_string();

    let result = handler.handle(command).await;
    assert!(matches!(result, Err(DomainError::InvalidDraft(_))));
    assert_eq!(gateway.saved_count().await, 0);
    assert_eq!(event_bus.get_event_count().await, 0);
}

#[tokio::test]
async fn test_save_subscription_with_foreign_field_fails() {
    let (service, _, _) = setup(MockSubscriptionGateway::new());
    let handler = SaveSubscriptionHandler::new(service);

    // Percent change belongs to runtime-change, not exceeds-duration
    let mut command = save_command();
    command
        .extra_fields
        .insert("task-percent-change".to_string(), "10".to_string());

    let result = handler.handle(command).await;
    assert!(matches!(result, Err(DomainError::InvalidSelection(_))));
}

#[tokio::test]
async fn test_save_subscription_network_failure_is_a_banner() {
    let (service, _, event_bus) = setup(MockSubscriptionGateway::failing("connection reset"));
    let handler = SaveSubscriptionHandler::new(service);

    let banner = handler.handle(save_command()).await.unwrap();
    assert_eq!(banner.kind, BannerKind::Error);
    assert_eq!(
        banner.message,
        "Error adding your subscription: 'connection reset'"
    );
    assert_eq!(event_bus.get_event_count().await, 1);
}
