use async_trait::async_trait;
use log::info;
use std::str::FromStr;
use std::sync::Arc;

use crate::application::commands::command_handler::CommandHandler;
use crate::application::commands::subscription_commands::*;
use crate::application::services::SubscriptionSessionService;
use sprig_domain::shared::{DomainError, ResourceId, SessionId};
use sprig_domain::subscription::{ResourceType, SubscriptionDraft};

/// Open subscription session command handler
pub struct OpenSubscriptionSessionHandler {
    service: Arc<SubscriptionSessionService>,
}

impl OpenSubscriptionSessionHandler {
    pub fn new(service: Arc<SubscriptionSessionService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CommandHandler<OpenSubscriptionSessionCommand> for OpenSubscriptionSessionHandler {
    type Result = OpenSubscriptionSessionResult;

    async fn handle(
        &self,
        cmd: OpenSubscriptionSessionCommand,
    ) -> Result<Self::Result, DomainError> {
        let resource_type = ResourceType::from_str(&cmd.resource_type)?;
        self.service.open(resource_type, &cmd.resource_id).await
    }
}

/// Edit subscription draft command handler
pub struct EditSubscriptionDraftHandler {
    service: Arc<SubscriptionSessionService>,
}

impl EditSubscriptionDraftHandler {
    pub fn new(service: Arc<SubscriptionSessionService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CommandHandler<EditSubscriptionDraftCommand> for EditSubscriptionDraftHandler {
    type Result = EditSubscriptionDraftResult;

    async fn handle(&self, cmd: EditSubscriptionDraftCommand) -> Result<Self::Result, DomainError> {
        let session_id = SessionId::from_string(&cmd.session_id);
        self.service.apply(&session_id, cmd.edit).await
    }
}

/// Submit subscription command handler
pub struct SubmitSubscriptionHandler {
    service: Arc<SubscriptionSessionService>,
}

impl SubmitSubscriptionHandler {
    pub fn new(service: Arc<SubscriptionSessionService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CommandHandler<SubmitSubscriptionCommand> for SubmitSubscriptionHandler {
    type Result = SubmitSubscriptionResult;

    async fn handle(&self, cmd: SubmitSubscriptionCommand) -> Result<Self::Result, DomainError> {
        info!("Submitting subscription session: {}", cmd.session_id);
        let session_id = SessionId::from_string(&cmd.session_id);
        self.service.submit(&session_id).await
    }
}

/// Cancel subscription session command handler
pub struct CancelSubscriptionSessionHandler {
    service: Arc<SubscriptionSessionService>,
}

impl CancelSubscriptionSessionHandler {
    pub fn new(service: Arc<SubscriptionSessionService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CommandHandler<CancelSubscriptionSessionCommand> for CancelSubscriptionSessionHandler {
    type Result = CancelSubscriptionSessionResult;

    async fn handle(
        &self,
        cmd: CancelSubscriptionSessionCommand,
    ) -> Result<Self::Result, DomainError> {
        let session_id = SessionId::from_string(&cmd.session_id);
        self.service.cancel(&session_id).await
    }
}

/// Save subscription command handler.
///
/// Replays the inputs onto a fresh draft in form order (trigger, extra
/// fields, method, target) so the same selection and validation rules apply.
pub struct SaveSubscriptionHandler {
    service: Arc<SubscriptionSessionService>,
}

impl SaveSubscriptionHandler {
    pub fn new(service: Arc<SubscriptionSessionService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CommandHandler<SaveSubscriptionCommand> for SaveSubscriptionHandler {
    type Result = SaveSubscriptionResult;

    async fn handle(&self, cmd: SaveSubscriptionCommand) -> Result<Self::Result, DomainError> {
        info!(
            "Saving subscription for {} {}",
            cmd.resource_type, cmd.resource_id
        );

        let resource_type = ResourceType::from_str(&cmd.resource_type)?;
        let resource_id = ResourceId::new(cmd.resource_id)?;

        let mut draft = SubscriptionDraft::new(
            self.service.catalog_for(resource_type),
            resource_type,
            resource_id,
        );
        draft.select_trigger(&cmd.trigger_id)?;
        for (key, value) in cmd.extra_fields {
            draft.set_extra_field(&key, value)?;
        }
        draft.select_method(&cmd.method_id)?;
        draft.set_target_value(cmd.target);

        self.service.save_draft(&draft).await
    }
}
