use serde::{Deserialize, Serialize};
use specta::Type;

use super::value_objects::MethodId;

/// Where a notification is delivered.
///
/// One variant per delivery method, each carrying the single value the user
/// typed. Serializes as a one-key object keyed by the method's target path,
/// e.g. `{"email": "someone@example.com"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryTarget {
    /// Issue key to comment on
    JiraComment(String),
    /// `@user` or `#channel`
    Slack(String),
    /// Email address
    Email(String),
}

impl DeliveryTarget {
    pub fn new(method: MethodId, value: impl Into<String>) -> Self {
        let value = value.into();
        match method {
            MethodId::JiraComment => DeliveryTarget::JiraComment(value),
            MethodId::Slack => DeliveryTarget::Slack(value),
            MethodId::Email => DeliveryTarget::Email(value),
        }
    }

    pub fn method(&self) -> MethodId {
        match self {
            DeliveryTarget::JiraComment(_) => MethodId::JiraComment,
            DeliveryTarget::Slack(_) => MethodId::Slack,
            DeliveryTarget::Email(_) => MethodId::Email,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            DeliveryTarget::JiraComment(v) | DeliveryTarget::Slack(v) | DeliveryTarget::Email(v) => {
                v
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_keyed_by_target_path() {
        let target = DeliveryTarget::new(MethodId::Email, "a@b.com");
        assert_eq!(serde_json::to_value(&target).unwrap(), json!({"email": "a@b.com"}));

        let target = DeliveryTarget::new(MethodId::JiraComment, "ABC-1");
        assert_eq!(
            serde_json::to_value(&target).unwrap(),
            json!({"jira-comment": "ABC-1"})
        );
    }

    #[test]
    fn test_method_matches_variant() {
        let target = DeliveryTarget::new(MethodId::Slack, "@user");
        assert_eq!(target.method(), MethodId::Slack);
        assert_eq!(target.value(), "@user");
    }
}
