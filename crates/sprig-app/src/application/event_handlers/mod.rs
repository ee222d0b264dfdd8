mod analytics_handler;

pub use analytics_handler::AnalyticsEventHandler;
