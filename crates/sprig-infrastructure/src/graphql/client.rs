use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio::time::sleep;
use url::Url;

use sprig_domain::shared::DomainError;

use super::auth::{AuthAction, AuthState};
use super::response::GraphqlResponse;
use super::retry::RetryPolicy;
use crate::config::AppConfig;

const USER_AGENT: &str = concat!("sprig/", env!("CARGO_PKG_VERSION"));

/// GraphQL client for the CI server.
///
/// Every operation passes through the same chain: a response carrying data
/// marks the session authenticated, a 401 marks it deauthenticated, GraphQL
/// errors are reported to the log, 5xx responses are retried with backoff,
/// and each request is bounded by the configured timeout.
pub struct GraphqlClient {
    client: Client,
    endpoint: Url,
    retry: RetryPolicy,
    auth: Arc<AuthState>,
}

impl GraphqlClient {
    pub fn new(config: &AppConfig, auth: Arc<AuthState>) -> Result<Self> {
        let endpoint = Url::parse(&config.gql_url)
            .with_context(|| format!("Invalid GraphQL URL: {}", config.gql_url))?;

        // Session cookies carry the dashboard credentials
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(config.request_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            retry: RetryPolicy::from(&config.retry),
            auth,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Run a query or mutation and decode its `data` object
    pub async fn execute<V, D>(
        &self,
        operation_name: &str,
        query: &str,
        variables: V,
    ) -> Result<D, DomainError>
    where
        V: Serialize,
        D: DeserializeOwned,
    {
        let body = json!({
            "operationName": operation_name,
            "query": query,
            "variables": variables,
        });

        let response = self.send_with_retry(operation_name, &body).await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.auth.dispatch(AuthAction::Deauthenticate).await;
            return Err(DomainError::Unauthorized(format!(
                "{operation_name} rejected: not logged in"
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Infrastructure(format!(
                "{operation_name} failed with status {status}: {body}"
            )));
        }

        let envelope: GraphqlResponse<D> = response.json().await.map_err(|e| {
            DomainError::Deserialization(format!(
                "Failed to parse {operation_name} response: {e}"
            ))
        })?;

        for error in &envelope.errors {
            warn!(
                "GraphQL error in {}: {} (path: {:?})",
                operation_name, error.message, error.path
            );
        }

        match envelope.data {
            Some(data) => {
                self.auth.dispatch(AuthAction::Authenticate).await;
                Ok(data)
            }
            None => {
                let summary = envelope.error_summary();
                Err(DomainError::Infrastructure(if summary.is_empty() {
                    format!("{operation_name} returned no data")
                } else {
                    summary
                }))
            }
        }
    }

    async fn send_with_retry(
        &self,
        operation_name: &str,
        body: &serde_json::Value,
    ) -> Result<Response, DomainError> {
        let mut attempt = 1;

        loop {
            let result = self
                .client
                .post(self.endpoint.clone())
                .json(body)
                .send()
                .await;

            match result {
                Ok(response) if self.retry.should_retry(response.status(), attempt) => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        "⚠️  {} got {} (attempt {}/{}). Retrying in {}ms...",
                        operation_name,
                        response.status(),
                        attempt,
                        self.retry.max_attempts,
                        delay.as_millis()
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Ok(response) => {
                    if attempt > 1 {
                        debug!(
                            "{} finished after {} attempts with {}",
                            operation_name,
                            attempt,
                            response.status()
                        );
                    }
                    return Ok(response);
                }
                Err(e) => return Err(map_transport_error(operation_name, e)),
            }
        }
    }
}

fn map_transport_error(operation_name: &str, error: reqwest::Error) -> DomainError {
    if error.is_timeout() {
        DomainError::Timeout(format!("{operation_name}: {error}"))
    } else {
        DomainError::Network(format!("{operation_name}: {error}"))
    }
}
