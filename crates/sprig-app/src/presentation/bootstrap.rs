use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::application::commands::handlers::*;
use crate::application::event_handlers::AnalyticsEventHandler;
use crate::application::services::SubscriptionSessionService;
use crate::presentation::state::{AppState, CommandHandlers, Runtime, Services};
use sprig_domain::events::subscription_events::SubscriptionSaved;
use sprig_domain::events::EventSubscription;
use sprig_domain::subscription::SubscriptionGateway;
use sprig_infrastructure::config::AppConfig;
use sprig_infrastructure::events::InMemoryEventBus;
use sprig_infrastructure::graphql::{AuthState, GraphqlClient};
use sprig_infrastructure::logging::init_logger;
use sprig_infrastructure::subscription::GraphqlSubscriptionGateway;

/// Resolve the config file (platform default when `path` is `None`),
/// start logging and build the app state
pub async fn start(path: Option<&Path>) -> anyhow::Result<AppState> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => AppConfig::default_path().context("No config directory on this platform")?,
    };
    let config = AppConfig::resolve(&config_path)?;

    init_logger(config.resolved_log_dir(), config.log_level)?;

    build_app_state(config).await
}

pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let startup_started_at = Instant::now();

    info!("🔌 Building GraphQL client for {}", config.gql_url);
    let auth = Arc::new(AuthState::new());
    let graphql = Arc::new(
        GraphqlClient::new(&config, auth.clone())
            .context("Failed to initialize GraphQL client")?,
    );
    let gateway = Arc::new(GraphqlSubscriptionGateway::new(graphql.clone()))
        as Arc<dyn SubscriptionGateway>;

    // Initialize event bus and register event handlers
    info!("🔧 Initializing event bus...");
    let event_bus = Arc::new(InMemoryEventBus::new());
    let analytics = AnalyticsEventHandler::new();
    event_bus
        .subscribe(EventSubscription::<SubscriptionSaved, _>::boxed(
            analytics.clone(),
        ))
        .await;
    info!("✓ Event bus initialized and handlers registered");

    let subscription_session = Arc::new(
        SubscriptionSessionService::new(gateway, event_bus.clone())
            .with_idle_timeout(config.session_idle_timeout()),
    );

    info!("🔧 Initializing command handlers...");
    let command_handlers = CommandHandlers {
        open_subscription_session: Arc::new(OpenSubscriptionSessionHandler::new(
            subscription_session.clone(),
        )),
        edit_subscription_draft: Arc::new(EditSubscriptionDraftHandler::new(
            subscription_session.clone(),
        )),
        submit_subscription: Arc::new(SubmitSubscriptionHandler::new(
            subscription_session.clone(),
        )),
        cancel_subscription_session: Arc::new(CancelSubscriptionSessionHandler::new(
            subscription_session.clone(),
        )),
        save_subscription: Arc::new(SaveSubscriptionHandler::new(subscription_session.clone())),
    };
    info!("✓ Command handlers initialized");

    info!(
        "✅ AppState ready ({}ms)",
        startup_started_at.elapsed().as_millis()
    );

    Ok(AppState {
        runtime: Runtime {
            config,
            auth,
            graphql,
            event_bus,
        },
        services: Services {
            subscription_session,
            analytics,
        },
        command_handlers,
    })
}
