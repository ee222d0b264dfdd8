use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use specta::Type;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\w-]+(\.[\w-]+)*@([\w-]+\.)*\w[\w-]{0,66}\.[a-z]{2,6}(\.[a-z]{2})?$")
        .expect("email pattern is valid")
});

static SLACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[@#]\S+$").expect("slack pattern is valid"));

static JIRA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*-[0-9]+$").expect("jira pattern is valid"));

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("duration pattern is valid"));

/// Closed set of input checks a trigger field or delivery method can carry.
///
/// Validators are plain data so catalogs stay serializable and every check
/// can be exercised on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// `local@domain.tld`
    Email,
    /// `@user` or `#channel`
    Slack,
    /// Issue key such as `ABC-123`
    JiraIssue,
    /// Whole number of seconds, zero or more
    Duration,
    /// Non-negative number, decimals allowed
    Percentage,
    /// Anything but whitespace
    NonEmpty,
}

impl Validator {
    pub fn validate(&self, value: &str) -> bool {
        match self {
            Validator::Email => EMAIL_RE.is_match(value),
            Validator::Slack => SLACK_RE.is_match(value),
            Validator::JiraIssue => JIRA_RE.is_match(value),
            Validator::Duration => DURATION_RE.is_match(value),
            Validator::Percentage => is_percentage(value),
            Validator::NonEmpty => !value.trim().is_empty(),
        }
    }
}

fn is_percentage(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    match trimmed.parse::<f64>() {
        Ok(n) => n.is_finite() && n >= 0.0,
        Err(_) => false,
    }
}
