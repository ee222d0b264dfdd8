mod auth;
mod client;
mod response;
mod retry;

pub use auth::{AuthAction, AuthSnapshot, AuthState};
pub use client::GraphqlClient;
pub use response::{GraphqlError, GraphqlResponse};
pub use retry::RetryPolicy;
