use serde::{Deserialize, Serialize};
use specta::Type;
use std::collections::BTreeMap;

use crate::application::commands::command_handler::Command;
use crate::application::dtos::{Banner, DraftEdit, SubscriptionDraftDto};

// ============================================================
// Open Subscription Session Command
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct OpenSubscriptionSessionCommand {
    /// TASK, PATCH or VERSION (case-insensitive)
    pub resource_type: String,
    pub resource_id: String,
}

impl Command for OpenSubscriptionSessionCommand {
    const NAME: &'static str = "open_subscription_session";
}

pub type OpenSubscriptionSessionResult = SubscriptionDraftDto;

// ============================================================
// Edit Subscription Draft Command
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct EditSubscriptionDraftCommand {
    pub session_id: String,
    pub edit: DraftEdit,
}

impl Command for EditSubscriptionDraftCommand {
    const NAME: &'static str = "edit_subscription_draft";
}

pub type EditSubscriptionDraftResult = SubscriptionDraftDto;

// ============================================================
// Submit Subscription Command
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct SubmitSubscriptionCommand {
    pub session_id: String,
}

impl Command for SubmitSubscriptionCommand {
    const NAME: &'static str = "submit_subscription";
}

pub type SubmitSubscriptionResult = Banner;

// ============================================================
// Cancel Subscription Session Command
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct CancelSubscriptionSessionCommand {
    pub session_id: String,
}

impl Command for CancelSubscriptionSessionCommand {
    const NAME: &'static str = "cancel_subscription_session";
}

pub type CancelSubscriptionSessionResult = ();

// ============================================================
// Save Subscription Command
// ============================================================

/// One-shot save for hosts that collect every input up front
#[derive(Debug, Clone, Serialize, Deserialize, Type)]
pub struct SaveSubscriptionCommand {
    pub resource_type: String,
    pub resource_id: String,
    pub trigger_id: String,
    #[serde(default)]
    pub extra_fields: BTreeMap<String, String>,
    pub method_id: String,
    pub target: String,
}

impl Command for SaveSubscriptionCommand {
    const NAME: &'static str = "save_subscription";
}

pub type SaveSubscriptionResult = Banner;
