use async_trait::async_trait;
use log::{debug, warn};
use sprig_domain::shared::DomainError;

/// One request from the subscription form
pub trait Command: Send + Sync {
    /// Stable name used in logs
    const NAME: &'static str;
}

#[async_trait]
pub trait CommandHandler<C: Command + 'static>: Send + Sync {
    type Result: Send;

    async fn handle(&self, command: C) -> Result<Self::Result, DomainError>;

    /// `handle` with failures logged under the command's name
    async fn execute(&self, command: C) -> Result<Self::Result, DomainError> {
        debug!("Executing {}", C::NAME);
        let result = self.handle(command).await;
        if let Err(e) = &result {
            warn!("{} failed: {}", C::NAME, e.format_with_code());
        }
        result
    }
}
