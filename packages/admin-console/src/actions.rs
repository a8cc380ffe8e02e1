//! Closed set of mutating admin actions.
//!
//! Every action the console can dispatch is a variant here. Adding one forces
//! a decision in [`AdminAction::requires_reason`], since that match is
//! exhaustive.

use std::fmt;

use serde_json::{json, Map, Value};

use crate::api::{MutationMethod, MutationRequest};
use crate::models::{ExperienceStatus, UserRole};
use crate::types::ResourceKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserAction {
    ChangeRole(UserRole),
    Block,
    Unblock,
    Ban,
    Unban,
    InvalidateSessions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExperienceAction {
    SetStatus(ExperienceStatus),
    Deactivate,
    Reactivate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookingAction {
    Cancel,
    Refund,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportAction {
    AssignToMe,
    MarkInvestigating,
    MarkHandled,
    MarkIgnored,
    PauseExperience,
    SuspendUser,
}

impl ReportAction {
    /// Action verb sent in the report action body.
    pub fn verb(&self) -> &'static str {
        match self {
            ReportAction::AssignToMe => "assign_to_me",
            ReportAction::MarkInvestigating => "mark_investigating",
            ReportAction::MarkHandled => "mark_handled",
            ReportAction::MarkIgnored => "mark_ignored",
            ReportAction::PauseExperience => "pause_experience",
            ReportAction::SuspendUser => "suspend_user",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminAction {
    User(UserAction),
    Experience(ExperienceAction),
    Booking(BookingAction),
    Report(ReportAction),
}

impl AdminAction {
    pub fn kind(&self) -> ResourceKind {
        match self {
            AdminAction::User(_) => ResourceKind::User,
            AdminAction::Experience(_) => ResourceKind::Experience,
            AdminAction::Booking(_) => ResourceKind::Booking,
            AdminAction::Report(_) => ResourceKind::Report,
        }
    }

    /// Stable name used in [`ActionKey`].
    ///
    /// Payload-carrying variants share one name, so two role changes on the
    /// same user contend for the same key.
    pub fn name(&self) -> &'static str {
        match self {
            AdminAction::User(action) => match action {
                UserAction::ChangeRole(_) => "role",
                UserAction::Block => "block",
                UserAction::Unblock => "unblock",
                UserAction::Ban => "ban",
                UserAction::Unban => "unban",
                UserAction::InvalidateSessions => "sessions",
            },
            AdminAction::Experience(action) => match action {
                ExperienceAction::SetStatus(_) => "status",
                ExperienceAction::Deactivate => "deactivate",
                ExperienceAction::Reactivate => "reactivate",
            },
            AdminAction::Booking(action) => match action {
                BookingAction::Cancel => "cancel",
                BookingAction::Refund => "refund",
            },
            AdminAction::Report(action) => action.verb(),
        }
    }

    /// Whether the operator must confirm and give a non-empty reason first.
    pub fn requires_reason(&self) -> bool {
        match self {
            AdminAction::User(action) => match action {
                UserAction::Block | UserAction::Unblock | UserAction::Ban | UserAction::Unban => {
                    true
                }
                UserAction::ChangeRole(_) | UserAction::InvalidateSessions => false,
            },
            AdminAction::Experience(action) => match action {
                ExperienceAction::SetStatus(status) => match status {
                    ExperienceStatus::Disabled | ExperienceStatus::Cancelled => true,
                    ExperienceStatus::Active => false,
                },
                ExperienceAction::Deactivate => true,
                ExperienceAction::Reactivate => false,
            },
            AdminAction::Booking(action) => match action {
                BookingAction::Cancel | BookingAction::Refund => true,
            },
            AdminAction::Report(action) => match action {
                ReportAction::MarkIgnored
                | ReportAction::PauseExperience
                | ReportAction::SuspendUser => true,
                ReportAction::AssignToMe
                | ReportAction::MarkInvestigating
                | ReportAction::MarkHandled => false,
            },
        }
    }

    /// Human-readable description used in prompts and banners.
    pub fn describe(&self) -> String {
        match self {
            AdminAction::User(UserAction::ChangeRole(role)) => {
                format!("change role to {}", role.as_str())
            }
            AdminAction::User(UserAction::InvalidateSessions) => "invalidate sessions".to_string(),
            AdminAction::Experience(ExperienceAction::SetStatus(status)) => {
                format!("set status to {}", status.as_str())
            }
            AdminAction::Report(action) => action.verb().replace('_', " "),
            other => other.name().to_string(),
        }
    }

    /// Build the mutating request for `entity_id`.
    ///
    /// `reason` is placed in the body only when present.
    pub fn request(&self, entity_id: &str, reason: Option<&str>) -> MutationRequest {
        let (method, path, mut body) = match self {
            AdminAction::User(action) => {
                let base = format!("/users/{}", entity_id);
                match action {
                    UserAction::ChangeRole(role) => (
                        MutationMethod::Patch,
                        format!("{}/role", base),
                        json!({ "role": role.as_str() }),
                    ),
                    UserAction::Block | UserAction::Unblock => (
                        MutationMethod::Patch,
                        format!("{}/block", base),
                        json!({ "blocked": matches!(action, UserAction::Block) }),
                    ),
                    UserAction::Ban | UserAction::Unban => (
                        MutationMethod::Patch,
                        format!("{}/ban", base),
                        json!({ "banned": matches!(action, UserAction::Ban) }),
                    ),
                    UserAction::InvalidateSessions => (
                        MutationMethod::Patch,
                        format!("{}/sessions", base),
                        json!({ "invalidate": true }),
                    ),
                }
            }
            AdminAction::Experience(action) => {
                let base = format!("/experiences/{}", entity_id);
                match action {
                    ExperienceAction::SetStatus(status) => (
                        MutationMethod::Patch,
                        format!("{}/status", base),
                        json!({ "status": status.as_str() }),
                    ),
                    ExperienceAction::Deactivate | ExperienceAction::Reactivate => (
                        MutationMethod::Patch,
                        format!("{}/active", base),
                        json!({ "isActive": matches!(action, ExperienceAction::Reactivate) }),
                    ),
                }
            }
            AdminAction::Booking(_) => (
                MutationMethod::Post,
                format!("/bookings/{}/{}", entity_id, self.name()),
                Value::Object(Map::new()),
            ),
            AdminAction::Report(action) => (
                MutationMethod::Post,
                format!("/reports/{}/actions", entity_id),
                json!({ "action": action.verb() }),
            ),
        };

        if let (Some(reason), Value::Object(fields)) = (reason, &mut body) {
            fields.insert("reason".to_string(), Value::String(reason.to_string()));
        }

        MutationRequest { method, path, body }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Identifies one in-flight-able operation: `(kind, entity id, action name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub kind: ResourceKind,
    pub entity_id: String,
    pub action: &'static str,
}

impl ActionKey {
    pub fn new(entity_id: impl Into<String>, action: &AdminAction) -> Self {
        Self {
            kind: action.kind(),
            entity_id: entity_id.into(),
            action: action.name(),
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.kind.label(), self.entity_id, self.action)
    }
}

/// What the operator is asked to confirm before a critical action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalPrompt {
    pub kind: ResourceKind,
    pub entity_id: String,
    pub action: String,
}

impl CriticalPrompt {
    pub fn new(entity_id: &str, action: &AdminAction) -> Self {
        Self {
            kind: action.kind(),
            entity_id: entity_id.to_string(),
            action: action.describe(),
        }
    }

    pub fn message(&self) -> String {
        format!(
            "Confirm {} on {} {}",
            self.action,
            self.kind.label(),
            self.entity_id
        )
    }
}
