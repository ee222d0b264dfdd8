mod subscription_handlers;

#[cfg(test)]
mod tests;

pub use subscription_handlers::{
    CancelSubscriptionSessionHandler, EditSubscriptionDraftHandler,
    OpenSubscriptionSessionHandler, SaveSubscriptionHandler, SubmitSubscriptionHandler,
};
