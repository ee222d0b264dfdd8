use std::sync::Arc;

use crate::application::commands::handlers::*;
use crate::application::event_handlers::AnalyticsEventHandler;
use crate::application::services::SubscriptionSessionService;
use sprig_domain::events::EventBus;
use sprig_infrastructure::config::AppConfig;
use sprig_infrastructure::graphql::{AuthState, GraphqlClient};

/// Command handlers container
pub struct CommandHandlers {
    pub open_subscription_session: Arc<OpenSubscriptionSessionHandler>,
    pub edit_subscription_draft: Arc<EditSubscriptionDraftHandler>,
    pub submit_subscription: Arc<SubmitSubscriptionHandler>,
    pub cancel_subscription_session: Arc<CancelSubscriptionSessionHandler>,
    pub save_subscription: Arc<SaveSubscriptionHandler>,
}

pub struct Runtime {
    pub config: AppConfig,
    pub auth: Arc<AuthState>,
    pub graphql: Arc<GraphqlClient>,
    pub event_bus: Arc<dyn EventBus>,
}

pub struct Services {
    pub subscription_session: Arc<SubscriptionSessionService>,
    pub analytics: AnalyticsEventHandler,
}

pub struct AppState {
    pub runtime: Runtime,
    pub services: Services,
    pub command_handlers: CommandHandlers,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        crate::presentation::bootstrap::build_app_state(config).await
    }
}
