use chrono::Utc;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::application::dtos::{Banner, DraftEdit, SubscriptionDraftDto};
use sprig_domain::events::subscription_events::{SubscriptionDraftDiscarded, SubscriptionSaved};
use sprig_domain::events::EventBus;
use sprig_domain::shared::{DomainError, ResourceId, SessionId};
use sprig_domain::subscription::{
    ResourceType, SubscriptionCatalog, SubscriptionDraft, SubscriptionGateway,
    SubscriptionPayload,
};

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct OpenSession {
    draft: SubscriptionDraft,
    last_active: Instant,
}

impl OpenSession {
    fn new(draft: SubscriptionDraft) -> Self {
        Self {
            draft,
            last_active: Instant::now(),
        }
    }
}

/// Holds open configuration sessions, one draft per session.
///
/// A session is opened when the configuration form is shown and closed by
/// a successful `submit` or by `cancel`. Hosts should cancel when the form
/// is dismissed; sessions left idle longer than the idle timeout are
/// dropped the next time a session is opened. Each draft is mutated under
/// the write lock, so edits to one session apply one at a time.
pub struct SubscriptionSessionService {
    gateway: Arc<dyn SubscriptionGateway>,
    event_bus: Arc<dyn EventBus>,
    catalogs: HashMap<ResourceType, Arc<SubscriptionCatalog>>,
    idle_timeout: Duration,
    sessions: RwLock<HashMap<SessionId, OpenSession>>,
}

impl SubscriptionSessionService {
    pub fn new(gateway: Arc<dyn SubscriptionGateway>, event_bus: Arc<dyn EventBus>) -> Self {
        let catalogs = [ResourceType::Task, ResourceType::Patch, ResourceType::Version]
            .into_iter()
            .map(|rt| (rt, Arc::new(SubscriptionCatalog::for_resource(rt))))
            .collect();

        Self {
            gateway,
            event_bus,
            catalogs,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Replace the preset catalog used for new sessions of a resource type
    pub fn with_catalog(mut self, resource_type: ResourceType, catalog: SubscriptionCatalog) -> Self {
        self.catalogs.insert(resource_type, Arc::new(catalog));
        self
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub async fn open(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> Result<SubscriptionDraftDto, DomainError> {
        let resource_id = ResourceId::new(resource_id)?;
        let catalog = self.catalog_for(resource_type);

        let session_id = SessionId::new();
        let draft = SubscriptionDraft::new(catalog, resource_type, resource_id);
        let view = SubscriptionDraftDto::from_draft(&session_id, &draft);

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_active.elapsed() < self.idle_timeout);
        if sessions.len() < before {
            info!(
                "Dropped {} idle subscription session(s)",
                before - sessions.len()
            );
        }
        sessions.insert(session_id.clone(), OpenSession::new(draft));
        drop(sessions);

        info!(
            "Opened subscription session {} for {} {}",
            session_id,
            resource_type.as_str(),
            view.resource_id
        );

        Ok(view)
    }

    pub async fn view(&self, session_id: &SessionId) -> Result<SubscriptionDraftDto, DomainError> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(session_id)
            .ok_or_else(|| session_not_found(session_id))?;
        Ok(SubscriptionDraftDto::from_draft(session_id, &session.draft))
    }

    /// Apply one form input to the session's draft and return the refreshed view
    pub async fn apply(
        &self,
        session_id: &SessionId,
        edit: DraftEdit,
    ) -> Result<SubscriptionDraftDto, DomainError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| session_not_found(session_id))?;
        session.last_active = Instant::now();
        let draft = &mut session.draft;

        match edit {
            DraftEdit::SelectTrigger { trigger_id } => draft.select_trigger(&trigger_id)?,
            DraftEdit::SelectMethod { method_id } => draft.select_method(&method_id)?,
            DraftEdit::SetExtraField { key, value } => draft.set_extra_field(&key, value)?,
            DraftEdit::SetTargetValue { value } => draft.set_target_value(value),
        }

        Ok(SubscriptionDraftDto::from_draft(session_id, draft))
    }

    /// Close the session without submitting
    pub async fn cancel(&self, session_id: &SessionId) -> Result<(), DomainError> {
        let draft = self
            .sessions
            .write()
            .await
            .remove(session_id)
            .map(|session| session.draft)
            .ok_or_else(|| session_not_found(session_id))?;

        info!("Subscription session {} cancelled", session_id);

        let event = SubscriptionDraftDiscarded {
            resource_type: draft.resource_type(),
            resource_id: draft.resource_id().clone(),
            occurred_at: Utc::now(),
        };
        if let Err(e) = self.event_bus.publish(Box::new(event)).await {
            warn!("Failed to publish SubscriptionDraftDiscarded: {}", e);
        }

        Ok(())
    }

    /// Submit the session's draft.
    ///
    /// An invalid draft is an `InvalidDraft` error. Otherwise the gateway
    /// outcome is reported as a banner, and only a successful save closes
    /// the session; after a failure the draft stays as it was.
    pub async fn submit(&self, session_id: &SessionId) -> Result<Banner, DomainError> {
        let payload = {
            let sessions = self.sessions.read().await;
            let session = sessions
                .get(session_id)
                .ok_or_else(|| session_not_found(session_id))?;
            session.draft.build_payload()?
        };

        let banner = self.deliver(payload).await;
        if banner.is_success() {
            self.sessions.write().await.remove(session_id);
        }

        Ok(banner)
    }

    /// Submit a draft that never went through a session
    pub async fn save_draft(&self, draft: &SubscriptionDraft) -> Result<Banner, DomainError> {
        let payload = draft.build_payload()?;
        Ok(self.deliver(payload).await)
    }

    pub async fn open_session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn deliver(&self, payload: SubscriptionPayload) -> Banner {
        info!(
            "Submitting subscription for {} {} (trigger: {}, method: {})",
            payload.resource_type().as_str(),
            payload.resource_id(),
            payload.trigger().as_str(),
            payload.method().as_str()
        );

        let result = self.gateway.save_subscription(&payload).await;

        let event = SubscriptionSaved::from_payload(&payload, result.is_ok());
        if let Err(e) = self.event_bus.publish(Box::new(event)).await {
            warn!("Failed to publish SubscriptionSaved: {}", e);
        }

        match result {
            Ok(()) => {
                info!("Subscription saved for {}", payload.resource_id());
                Banner::success()
            }
            Err(e) => {
                warn!("Failed to save subscription: {}", e.format_with_code());
                Banner::error(e.message())
            }
        }
    }

    pub fn catalog_for(&self, resource_type: ResourceType) -> Arc<SubscriptionCatalog> {
        self.catalogs
            .get(&resource_type)
            .cloned()
            .unwrap_or_else(|| Arc::new(SubscriptionCatalog::for_resource(resource_type)))
    }
}

fn session_not_found(session_id: &SessionId) -> DomainError {
    DomainError::SessionNotFound(session_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use sprig_domain::events::DomainEvent;
    use sprig_domain::subscription::MethodId;
    use std::sync::Mutex;

    use crate::application::dtos::BannerKind;

    mock! {
        pub Gateway {}

        #[async_trait]
        impl SubscriptionGateway for Gateway {
            async fn save_subscription(&self, payload: &SubscriptionPayload) -> Result<(), DomainError>;
        }
    }

    /// Records the type name of every published event
    #[derive(Default)]
    struct RecordingEventBus {
        events: Mutex<Vec<&'static str>>,
        saved: Mutex<Vec<SubscriptionSaved>>,
    }

    #[async_trait]
    impl EventBus for RecordingEventBus {
        async fn publish(&self, event: Box<dyn DomainEvent>) -> Result<(), DomainError> {
            if let Some(saved) = event.as_any().downcast_ref::<SubscriptionSaved>() {
                self.saved.lock().unwrap().push(saved.clone());
            }
            self.events.lock().unwrap().push(event.event_type_name());
            Ok(())
        }
    }

    fn service(gateway: MockGateway) -> (SubscriptionSessionService, Arc<RecordingEventBus>) {
        let bus = Arc::new(RecordingEventBus::default());
        (
            SubscriptionSessionService::new(Arc::new(gateway), bus.clone()),
            bus,
        )
    }

    fn session_id(view: &SubscriptionDraftDto) -> SessionId {
        SessionId::from_string(&view.session_id)
    }

    #[tokio::test]
    async fn test_open_starts_on_first_trigger_and_method() {
        let (service, _) = service(MockGateway::new());

        let view = service.open(ResourceType::Task, "task_1").await.unwrap();

        assert_eq!(view.resource_type, "TASK");
        assert_eq!(view.selected_trigger, "outcome");
        assert_eq!(view.selected_method, MethodId::JiraComment);
        assert_eq!(view.target_path, "jira-comment");
        assert_eq!(view.target_placeholder, "ABC-123");
        assert_eq!(view.triggers.len(), 5);
        assert!(view.extra_fields.is_empty());
        assert!(!view.is_valid);
        assert_eq!(view.errors, vec!["Invalid JIRA Issue".to_string()]);
        assert_eq!(service.open_session_count().await, 1);
    }

    #[tokio::test]
    async fn test_open_rejects_blank_resource_id() {
        let (service, _) = service(MockGateway::new());
        let err = service.open(ResourceType::Patch, " ").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(service.open_session_count().await, 0);
    }

    #[tokio::test]
    async fn test_apply_edits_refresh_view() {
        let (service, _) = service(MockGateway::new());
        let view = service.open(ResourceType::Task, "task_1").await.unwrap();
        let id = session_id(&view);

        let view = service
            .apply(
                &id,
                DraftEdit::SelectTrigger {
                    trigger_id: "exceeds-duration".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(view.extra_fields.len(), 1);
        assert!(!view.extra_fields[0].valid);

        let view = service
            .apply(
                &id,
                DraftEdit::SetExtraField {
                    key: "task-duration-secs".to_string(),
                    value: "120".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(view.extra_fields[0].valid);
        assert_eq!(view.extra_fields[0].value, "120");

        service
            .apply(
                &id,
                DraftEdit::SelectMethod {
                    method_id: "email".to_string(),
                },
            )
            .await
            .unwrap();
        let view = service
            .apply(
                &id,
                DraftEdit::SetTargetValue {
                    value: "a@b.com".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(view.target_label, "Email Address");
        assert!(view.target_valid);
        assert!(view.is_valid);
        assert!(view.errors.is_empty());
    }

    #[tokio::test]
    async fn test_apply_unknown_selection_leaves_draft_unchanged() {
        let (service, _) = service(MockGateway::new());
        let id = session_id(&service.open(ResourceType::Task, "task_1").await.unwrap());

        let err = service
            .apply(
                &id,
                DraftEdit::SelectMethod {
                    method_id: "fax".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidSelection(_)));

        let view = service.view(&id).await.unwrap();
        assert_eq!(view.selected_method, MethodId::JiraComment);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let (service, _) = service(MockGateway::new());
        let id = SessionId::new();

        assert!(matches!(
            service.view(&id).await,
            Err(DomainError::SessionNotFound(_))
        ));
        assert!(matches!(
            service.submit(&id).await,
            Err(DomainError::SessionNotFound(_))
        ));
        assert!(matches!(
            service.cancel(&id).await,
            Err(DomainError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_invalid_draft_keeps_session() {
        let mut gateway = MockGateway::new();
        gateway.expect_save_subscription().never();
        let (service, bus) = service(gateway);
        let id = session_id(&service.open(ResourceType::Version, "v1").await.unwrap());

        let err = service.submit(&id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidDraft(_)));
        assert_eq!(service.open_session_count().await, 1);
        assert!(bus.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_success_closes_session_and_publishes() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_save_subscription()
            .withf(|payload: &SubscriptionPayload| {
                payload.trigger().as_str() == "failure"
                    && payload.method() == MethodId::Slack
                    && payload.target().value() == "#ci-alerts"
                    && payload.extra_fields().is_empty()
            })
            .times(1)
            .returning(|_| Ok(()));
        let (service, bus) = service(gateway);
        let id = session_id(&service.open(ResourceType::Patch, "patch_9").await.unwrap());

        service
            .apply(
                &id,
                DraftEdit::SelectTrigger {
                    trigger_id: "failure".to_string(),
                },
            )
            .await
            .unwrap();
        service
            .apply(
                &id,
                DraftEdit::SelectMethod {
                    method_id: "slack".to_string(),
                },
            )
            .await
            .unwrap();
        service
            .apply(
                &id,
                DraftEdit::SetTargetValue {
                    value: "#ci-alerts".to_string(),
                },
            )
            .await
            .unwrap();

        let banner = service.submit(&id).await.unwrap();
        assert_eq!(banner, Banner::success());
        assert_eq!(service.open_session_count().await, 0);

        let saved = bus.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].accepted);
        assert_eq!(saved[0].resource_id.as_str(), "patch_9");
    }

    #[tokio::test]
    async fn test_submit_gateway_failure_becomes_error_banner() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_save_subscription()
            .times(1)
            .returning(|_| Err(DomainError::Infrastructure("invalid target".to_string())));
        let (service, bus) = service(gateway);
        let id = session_id(&service.open(ResourceType::Task, "task_1").await.unwrap());
        service
            .apply(
                &id,
                DraftEdit::SetTargetValue {
                    value: "ABC-123".to_string(),
                },
            )
            .await
            .unwrap();

        let banner = service.submit(&id).await.unwrap();
        assert_eq!(banner.kind, BannerKind::Error);
        assert_eq!(
            banner.message,
            "Error adding your subscription: 'invalid target'"
        );

        // The draft survives the failed save untouched
        let view = service.view(&id).await.unwrap();
        assert_eq!(view.target_value, "ABC-123");
        assert!(view.is_valid);
        assert_eq!(service.open_session_count().await, 1);

        let saved = bus.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert!(!saved[0].accepted);
    }

    #[tokio::test]
    async fn test_submit_can_be_retried_after_network_failure() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = calls.clone();
        let mut gateway = MockGateway::new();
        gateway
            .expect_save_subscription()
            .times(2)
            .returning(move |_| {
                if counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
                    Err(DomainError::Network("connection reset".to_string()))
                } else {
                    Ok(())
                }
            });
        let (service, _) = service(gateway);
        let id = session_id(&service.open(ResourceType::Task, "task_1").await.unwrap());
        service
            .apply(
                &id,
                DraftEdit::SetTargetValue {
                    value: "ABC-123".to_string(),
                },
            )
            .await
            .unwrap();

        let banner = service.submit(&id).await.unwrap();
        assert_eq!(banner, Banner::error("connection reset"));
        assert!(service.view(&id).await.is_ok());

        let banner = service.submit(&id).await.unwrap();
        assert!(banner.is_success());
        assert!(matches!(
            service.view(&id).await,
            Err(DomainError::SessionNotFound(_))
        ));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_idle_sessions_are_dropped_on_open() {
        let (service, _) = service(MockGateway::new());
        let service = service.with_idle_timeout(Duration::ZERO);

        let stale = session_id(&service.open(ResourceType::Task, "task_1").await.unwrap());
        let fresh = session_id(&service.open(ResourceType::Task, "task_2").await.unwrap());

        assert!(matches!(
            service.view(&stale).await,
            Err(DomainError::SessionNotFound(_))
        ));
        assert!(service.view(&fresh).await.is_ok());
        assert_eq!(service.open_session_count().await, 1);
    }

    #[tokio::test]
    async fn test_active_sessions_survive_open() {
        let (service, _) = service(MockGateway::new());
        let first = session_id(&service.open(ResourceType::Task, "task_1").await.unwrap());
        service.open(ResourceType::Patch, "patch_1").await.unwrap();

        assert!(service.view(&first).await.is_ok());
        assert_eq!(service.open_session_count().await, 2);
    }

    #[tokio::test]
    async fn test_cancel_closes_session_and_publishes_discard() {
        let (service, bus) = service(MockGateway::new());
        let id = session_id(&service.open(ResourceType::Task, "task_1").await.unwrap());

        service.cancel(&id).await.unwrap();

        assert_eq!(service.open_session_count().await, 0);
        let events = bus.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].ends_with("SubscriptionDraftDiscarded"));
    }

    #[tokio::test]
    async fn test_custom_catalog_replaces_preset() {
        use sprig_domain::subscription::{SubscriptionMethodControl, Trigger, TriggerId, Validator};

        let catalog = SubscriptionCatalog::new(
            vec![Trigger::new(TriggerId::new("regression").unwrap(), "A test regresses")],
            vec![SubscriptionMethodControl::new(
                MethodId::Email,
                "Email Address",
                "someone@example.com",
                Validator::Email,
            )],
        )
        .unwrap();
        let (service, _) = service(MockGateway::new());
        let service = service.with_catalog(ResourceType::Task, catalog);

        let view = service.open(ResourceType::Task, "task_1").await.unwrap();
        assert_eq!(view.selected_trigger, "regression");
        assert_eq!(view.methods.len(), 1);
        assert_eq!(view.selected_method, MethodId::Email);

        // Other resource types keep their preset
        let view = service.open(ResourceType::Patch, "patch_1").await.unwrap();
        assert_eq!(view.selected_trigger, "outcome");
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let (service, _) = service(MockGateway::new());
        let first = session_id(&service.open(ResourceType::Task, "task_1").await.unwrap());
        let second = session_id(&service.open(ResourceType::Task, "task_2").await.unwrap());

        service
            .apply(
                &first,
                DraftEdit::SetTargetValue {
                    value: "ABC-1".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(service.view(&first).await.unwrap().is_valid);
        assert!(!service.view(&second).await.unwrap().is_valid);
    }
}
