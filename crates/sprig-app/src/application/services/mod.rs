mod subscription_session_service;

pub use subscription_session_service::SubscriptionSessionService;
