use serde::{Deserialize, Serialize};
use specta::Type;
use std::collections::HashSet;
use std::str::FromStr;

use super::validator::Validator;
use super::value_objects::{MethodId, ResourceType, TriggerId};
use crate::shared::DomainError;

/// Additional input a trigger needs before it can be subscribed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
pub struct ExtraField {
    pub key: String,
    pub text: String,
    pub validator: Validator,
}

impl ExtraField {
    pub fn new(key: impl Into<String>, text: impl Into<String>, validator: Validator) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            validator,
        }
    }
}

/// A named event condition that can cause a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
pub struct Trigger {
    pub id: TriggerId,
    pub label: String,
    pub extra_fields: Vec<ExtraField>,
}

impl Trigger {
    pub fn new(id: TriggerId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            extra_fields: Vec::new(),
        }
    }

    pub fn with_extra_field(mut self, field: ExtraField) -> Self {
        self.extra_fields.push(field);
        self
    }

    pub fn extra_field(&self, key: &str) -> Option<&ExtraField> {
        self.extra_fields.iter().find(|f| f.key == key)
    }
}

/// How a delivery method is presented and checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
pub struct SubscriptionMethodControl {
    pub method: MethodId,
    pub label: String,
    pub placeholder: String,
    pub validator: Validator,
}

impl SubscriptionMethodControl {
    pub fn new(
        method: MethodId,
        label: impl Into<String>,
        placeholder: impl Into<String>,
        validator: Validator,
    ) -> Self {
        Self {
            method,
            label: label.into(),
            placeholder: placeholder.into(),
            validator,
        }
    }

    /// Key of the delivery target field this method writes to
    pub fn target_path(&self) -> &'static str {
        self.method.as_str()
    }
}

/// Triggers and delivery methods offered by one embedding page
#[derive(Debug, Clone, Serialize, Type)]
pub struct SubscriptionCatalog {
    triggers: Vec<Trigger>,
    methods: Vec<SubscriptionMethodControl>,
}

impl SubscriptionCatalog {
    pub fn new(
        triggers: Vec<Trigger>,
        methods: Vec<SubscriptionMethodControl>,
    ) -> Result<Self, DomainError> {
        if triggers.is_empty() {
            return Err(DomainError::InvalidInput(
                "Catalog needs at least one trigger".to_string(),
            ));
        }
        if methods.is_empty() {
            return Err(DomainError::InvalidInput(
                "Catalog needs at least one subscription method".to_string(),
            ));
        }

        let mut trigger_ids = HashSet::new();
        for trigger in &triggers {
            if trigger.id.as_str().trim().is_empty() {
                return Err(DomainError::InvalidInput(
                    "Trigger id cannot be empty".to_string(),
                ));
            }
            if !trigger_ids.insert(trigger.id.as_str()) {
                return Err(DomainError::InvalidInput(format!(
                    "Duplicate trigger: {}",
                    trigger.id
                )));
            }
            let mut keys = HashSet::new();
            for field in &trigger.extra_fields {
                if !keys.insert(field.key.as_str()) {
                    return Err(DomainError::InvalidInput(format!(
                        "Duplicate extra field '{}' on trigger {}",
                        field.key, trigger.id
                    )));
                }
            }
        }

        let mut method_ids = HashSet::new();
        for control in &methods {
            if !method_ids.insert(control.method) {
                return Err(DomainError::InvalidInput(format!(
                    "Duplicate subscription method: {}",
                    control.method
                )));
            }
        }

        Ok(Self { triggers, methods })
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn methods(&self) -> &[SubscriptionMethodControl] {
        &self.methods
    }

    pub fn trigger(&self, id: &str) -> Result<&Trigger, DomainError> {
        self.trigger_index(id).map(|idx| &self.triggers[idx])
    }

    pub fn method(&self, id: &str) -> Result<&SubscriptionMethodControl, DomainError> {
        self.method_index(id).map(|idx| &self.methods[idx])
    }

    pub(crate) fn trigger_index(&self, id: &str) -> Result<usize, DomainError> {
        self.triggers
            .iter()
            .position(|t| t.id.as_str() == id)
            .ok_or_else(|| DomainError::InvalidSelection(format!("Trigger not found: {id}")))
    }

    pub(crate) fn method_index(&self, id: &str) -> Result<usize, DomainError> {
        let method = MethodId::from_str(id)?;
        self.methods
            .iter()
            .position(|m| m.method == method)
            .ok_or_else(|| {
                DomainError::InvalidSelection(format!("Subscription method not offered: {id}"))
            })
    }

    /// Preset used on the task page
    pub fn task() -> Self {
        let mut triggers = outcome_triggers("task");
        triggers.push(
            Trigger::new(
                builtin_trigger("exceeds-duration"),
                "The runtime for this task exceeds some duration",
            )
            .with_extra_field(ExtraField::new(
                "task-duration-secs",
                "Task duration (seconds)",
                Validator::Duration,
            )),
        );
        triggers.push(
            Trigger::new(
                builtin_trigger("runtime-change"),
                "This task succeeds and its runtime changes by some percentage",
            )
            .with_extra_field(ExtraField::new(
                "task-percent-change",
                "Percent change",
                Validator::Percentage,
            )),
        );

        Self {
            triggers,
            methods: default_methods(),
        }
    }

    /// Preset used on the patch page
    pub fn patch() -> Self {
        Self {
            triggers: outcome_triggers("patch"),
            methods: default_methods(),
        }
    }

    /// Preset used on the version page
    pub fn version() -> Self {
        Self {
            triggers: outcome_triggers("version"),
            methods: default_methods(),
        }
    }

    pub fn for_resource(resource_type: ResourceType) -> Self {
        match resource_type {
            ResourceType::Task => Self::task(),
            ResourceType::Patch => Self::patch(),
            ResourceType::Version => Self::version(),
        }
    }
}

fn builtin_trigger(id: &str) -> TriggerId {
    // Preset ids are non-empty literals
    TriggerId(id.to_string())
}

fn outcome_triggers(noun: &str) -> Vec<Trigger> {
    vec![
        Trigger::new(builtin_trigger("outcome"), format!("This {noun} finishes")),
        Trigger::new(builtin_trigger("failure"), format!("This {noun} fails")),
        Trigger::new(builtin_trigger("success"), format!("This {noun} succeeds")),
    ]
}

fn default_methods() -> Vec<SubscriptionMethodControl> {
    vec![
        SubscriptionMethodControl::new(
            MethodId::JiraComment,
            "JIRA Issue",
            "ABC-123",
            Validator::JiraIssue,
        ),
        SubscriptionMethodControl::new(
            MethodId::Slack,
            "Slack Username or Channel",
            "@user",
            Validator::Slack,
        ),
        SubscriptionMethodControl::new(
            MethodId::Email,
            "Email Address",
            "someone@example.com",
            Validator::Email,
        ),
    ]
}
