use serde::{Deserialize, Serialize};
use specta::Type;

use sprig_domain::subscription::{MethodId, SubscriptionDraft};
use sprig_domain::SessionId;

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Your subscription has been added";

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct TriggerOptionDto {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct ExtraFieldDto {
    pub key: String,
    pub text: String,
    pub value: String,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct MethodOptionDto {
    pub id: MethodId,
    pub label: String,
}

/// Everything the configuration form renders for one open session
#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct SubscriptionDraftDto {
    pub session_id: String,
    pub resource_type: String,
    pub resource_id: String,
    pub triggers: Vec<TriggerOptionDto>,
    pub selected_trigger: String,
    pub extra_fields: Vec<ExtraFieldDto>,
    pub methods: Vec<MethodOptionDto>,
    pub selected_method: MethodId,
    pub target_label: String,
    pub target_placeholder: String,
    pub target_path: String,
    pub target_value: String,
    pub target_valid: bool,
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Dropdown label for a delivery method
pub fn method_option_label(method: MethodId) -> &'static str {
    match method {
        MethodId::JiraComment => "JIRA issue comment",
        MethodId::Slack => "Slack message",
        MethodId::Email => "Email",
    }
}

impl SubscriptionDraftDto {
    pub fn from_draft(session_id: &SessionId, draft: &SubscriptionDraft) -> Self {
        let catalog = draft.catalog();
        let trigger = draft.selected_trigger();
        let control = draft.method_control();

        let extra_fields = trigger
            .extra_fields
            .iter()
            .map(|field| {
                let value = draft.extra_field_value(&field.key);
                ExtraFieldDto {
                    key: field.key.clone(),
                    text: field.text.clone(),
                    value: value.to_string(),
                    valid: field.validator.validate(value),
                }
            })
            .collect();

        let target_value = draft.target_value();

        Self {
            session_id: session_id.as_str().to_string(),
            resource_type: draft.resource_type().as_str().to_string(),
            resource_id: draft.resource_id().as_str().to_string(),
            triggers: catalog
                .triggers()
                .iter()
                .map(|t| TriggerOptionDto {
                    id: t.id.as_str().to_string(),
                    label: t.label.clone(),
                })
                .collect(),
            selected_trigger: trigger.id.as_str().to_string(),
            extra_fields,
            methods: catalog
                .methods()
                .iter()
                .map(|m| MethodOptionDto {
                    id: m.method,
                    label: method_option_label(m.method).to_string(),
                })
                .collect(),
            selected_method: control.method,
            target_label: control.label.clone(),
            target_placeholder: control.placeholder.clone(),
            target_path: control.target_path().to_string(),
            target_value: target_value.to_string(),
            target_valid: control.validator.validate(target_value),
            is_valid: draft.is_valid(),
            errors: draft
                .field_errors()
                .into_iter()
                .map(|failure| failure.message)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Success,
    Error,
}

/// Transient message shown after a submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn success() -> Self {
        Self {
            kind: BannerKind::Success,
            message: SUBMIT_SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn error(reason: &str) -> Self {
        Self {
            kind: BannerKind::Error,
            message: format!("Error adding your subscription: '{reason}'"),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == BannerKind::Success
    }
}

/// A single input event from the configuration form
#[derive(Debug, Clone, Serialize, Deserialize, Type)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DraftEdit {
    SelectTrigger { trigger_id: String },
    SelectMethod { method_id: String },
    SetExtraField { key: String, value: String },
    SetTargetValue { value: String },
}
