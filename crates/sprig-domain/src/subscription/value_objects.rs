use serde::{Deserialize, Deserializer, Serialize};
use specta::Type;
use std::fmt;
use std::str::FromStr;

use crate::shared::DomainError;

/// Identifier of a triggering event, e.g. `outcome` or `exceeds-duration`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Type)]
pub struct TriggerId(pub(super) String);

impl TriggerId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidInput(
                "Trigger id cannot be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for TriggerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery method enumeration
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Type,
)]
#[serde(rename_all = "kebab-case")]
pub enum MethodId {
    /// Comment on an issue tracker ticket
    JiraComment,
    /// Chat message to a user or channel
    Slack,
    /// Email
    Email,
}

impl MethodId {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodId::JiraComment => "jira-comment",
            MethodId::Slack => "slack",
            MethodId::Email => "email",
        }
    }
}

impl FromStr for MethodId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jira-comment" => Ok(MethodId::JiraComment),
            "slack" => Ok(MethodId::Slack),
            "email" => Ok(MethodId::Email),
            _ => Err(DomainError::InvalidSelection(format!(
                "Unknown subscription method: {s}"
            ))),
        }
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of CI resource a subscription watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Task,
    Patch,
    Version,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Task => "TASK",
            ResourceType::Patch => "PATCH",
            ResourceType::Version => "VERSION",
        }
    }

    /// Lowercase form used by the subscription API's object selector
    pub fn selector_data(&self) -> &'static str {
        match self {
            ResourceType::Task => "task",
            ResourceType::Patch => "patch",
            ResourceType::Version => "version",
        }
    }
}

impl FromStr for ResourceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TASK" => Ok(ResourceType::Task),
            "PATCH" => Ok(ResourceType::Patch),
            "VERSION" => Ok(ResourceType::Version),
            _ => Err(DomainError::InvalidInput(format!(
                "Unknown resource type: {s}"
            ))),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
