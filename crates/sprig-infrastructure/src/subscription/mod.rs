mod gateway;
mod input;

pub use gateway::{GraphqlSubscriptionGateway, SAVE_SUBSCRIPTION};
pub use input::{SelectorInput, SubscriberInput, SubscriptionInput};
