use serde::{Deserialize, Serialize};
use specta::Type;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::catalog::{SubscriptionCatalog, SubscriptionMethodControl, Trigger};
use super::payload::SubscriptionPayload;
use super::target::DeliveryTarget;
use super::value_objects::{MethodId, ResourceType};
use crate::shared::{DomainError, ResourceId};

/// Input a validation failure points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum FieldRef {
    /// Extra field of the selected trigger, by key
    ExtraField(String),
    /// Delivery target of the selected method
    Target(MethodId),
}

/// A field whose current value fails its validator. Reported, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
pub struct ValidationFailure {
    pub field: FieldRef,
    pub message: String,
}

/// In-progress subscription configuration for one resource.
///
/// Created fresh for every configuration session and mutated one input event
/// at a time. Values typed for triggers or methods that are no longer
/// selected are kept, so switching back restores them, but they never reach
/// the payload.
#[derive(Debug, Clone)]
pub struct SubscriptionDraft {
    catalog: Arc<SubscriptionCatalog>,
    resource_type: ResourceType,
    resource_id: ResourceId,
    // Indices into the catalog; only ever set from a successful lookup
    trigger_idx: usize,
    method_idx: usize,
    extra_field_values: BTreeMap<String, String>,
    target_values: BTreeMap<MethodId, String>,
}

impl SubscriptionDraft {
    /// Start a draft on the catalog's first trigger and first method
    pub fn new(
        catalog: Arc<SubscriptionCatalog>,
        resource_type: ResourceType,
        resource_id: ResourceId,
    ) -> Self {
        Self {
            catalog,
            resource_type,
            resource_id,
            trigger_idx: 0,
            method_idx: 0,
            extra_field_values: BTreeMap::new(),
            target_values: BTreeMap::new(),
        }
    }

    // Getters
    pub fn catalog(&self) -> &SubscriptionCatalog {
        &self.catalog
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn resource_id(&self) -> &ResourceId {
        &self.resource_id
    }

    pub fn selected_trigger(&self) -> &Trigger {
        &self.catalog.triggers()[self.trigger_idx]
    }

    pub fn method_control(&self) -> &SubscriptionMethodControl {
        &self.catalog.methods()[self.method_idx]
    }

    pub fn selected_method(&self) -> MethodId {
        self.method_control().method
    }

    /// Stored value for an extra field, empty if never entered
    pub fn extra_field_value(&self, key: &str) -> &str {
        self.extra_field_values
            .get(key)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Delivery target value of the selected method, empty if never entered
    pub fn target_value(&self) -> &str {
        self.target_values
            .get(&self.selected_method())
            .map(String::as_str)
            .unwrap_or("")
    }

    // Mutations

    pub fn select_trigger(&mut self, trigger_id: &str) -> Result<(), DomainError> {
        self.trigger_idx = self.catalog.trigger_index(trigger_id)?;
        Ok(())
    }

    pub fn select_method(&mut self, method_id: &str) -> Result<(), DomainError> {
        self.method_idx = self.catalog.method_index(method_id)?;
        Ok(())
    }

    pub fn set_extra_field(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), DomainError> {
        let trigger = self.selected_trigger();
        if trigger.extra_field(key).is_none() {
            return Err(DomainError::InvalidSelection(format!(
                "Trigger {} has no field '{}'",
                trigger.id, key
            )));
        }
        self.extra_field_values.insert(key.to_string(), value.into());
        Ok(())
    }

    pub fn set_target_value(&mut self, value: impl Into<String>) {
        let method = self.selected_method();
        self.target_values.insert(method, value.into());
    }

    // Validation

    /// True iff the target value and every extra field of the selected trigger pass
    pub fn compute_validity(&self) -> bool {
        let control = self.method_control();
        if !control.validator.validate(self.target_value()) {
            return false;
        }
        self.selected_trigger()
            .extra_fields
            .iter()
            .all(|field| field.validator.validate(self.extra_field_value(&field.key)))
    }

    pub fn is_valid(&self) -> bool {
        self.compute_validity()
    }

    /// Every failing input of the current selection, extra fields first
    pub fn field_errors(&self) -> Vec<ValidationFailure> {
        let mut errors: Vec<ValidationFailure> = self
            .selected_trigger()
            .extra_fields
            .iter()
            .filter(|field| !field.validator.validate(self.extra_field_value(&field.key)))
            .map(|field| ValidationFailure {
                field: FieldRef::ExtraField(field.key.clone()),
                message: format!("Value of '{}' is invalid", field.text),
            })
            .collect();

        let control = self.method_control();
        if !control.validator.validate(self.target_value()) {
            errors.push(ValidationFailure {
                field: FieldRef::Target(control.method),
                message: format!("Invalid {}", control.label),
            });
        }

        errors
    }

    // Submission

    pub fn build_payload(&self) -> Result<SubscriptionPayload, DomainError> {
        if !self.compute_validity() {
            let reasons: Vec<String> = self
                .field_errors()
                .into_iter()
                .map(|failure| failure.message)
                .collect();
            return Err(DomainError::InvalidDraft(reasons.join("; ")));
        }

        let trigger = self.selected_trigger();
        let extra_fields = trigger
            .extra_fields
            .iter()
            .map(|field| {
                (
                    field.key.clone(),
                    self.extra_field_value(&field.key).to_string(),
                )
            })
            .collect();
        let method = self.selected_method();

        Ok(SubscriptionPayload {
            resource_type: self.resource_type,
            resource_id: self.resource_id.clone(),
            trigger: trigger.id.clone(),
            extra_fields,
            method,
            target: DeliveryTarget::new(method, self.target_value()),
        })
    }
}
