//! Entity payloads returned by the admin API.
//!
//! Only the fields the console displays or links on are modelled. Unknown
//! fields are ignored, and most known ones are optional because list and
//! detail endpoints embed different subsets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{EntityLink, Identified, Linked, ResourceKind};

// ============================================================================
// Users
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Guest,
    Host,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Guest => "guest",
            UserRole::Host => "host",
            UserRole::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(alias = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Expanded view returned by `GET /users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    pub user: AdminUser,
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub recent_audit: Vec<AuditEvent>,
}

// ============================================================================
// Experiences
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceStatus {
    Active,
    Disabled,
    Cancelled,
}

impl ExperienceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceStatus::Active => "active",
            ExperienceStatus::Disabled => "disabled",
            ExperienceStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub host_id: Option<String>,
    pub status: ExperienceStatus,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Bookings
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Refunded,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(alias = "_id")]
    pub id: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub guest_id: Option<String>,
    #[serde(default)]
    pub experience_id: Option<String>,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    #[serde(alias = "_id")]
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub refunded_amount: Option<f64>,
    #[serde(default)]
    pub provider_ref: Option<String>,
}

/// Expanded view returned by `GET /bookings/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetail {
    pub booking: Booking,
    #[serde(default)]
    pub payment: Option<PaymentSummary>,
    #[serde(default)]
    pub reports: Vec<Report>,
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Open,
    Investigating,
    Handled,
    Ignored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(alias = "_id")]
    pub id: String,
    pub target_type: String,
    pub target_id: String,
    pub reason: String,
    pub status: ReportStatus,
    #[serde(default)]
    pub reporter_id: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Audit
// ============================================================================

/// Backend-produced record of one successful mutation. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    #[serde(alias = "_id")]
    pub id: String,
    pub actor_id: String,
    #[serde(default)]
    pub actor_email: Option<String>,
    pub action_type: String,
    pub target_type: String,
    pub target_id: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub diff: Option<serde_json::Value>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Aggregates
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub total_users: u64,
    pub total_experiences: u64,
    pub total_bookings: u64,
    pub open_reports: u64,
    pub bookings_today: u64,
    pub revenue_today: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSignal {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentsHealth {
    pub status: String,
    pub failed_last_24h: u64,
    pub pending_refunds: u64,
    pub webhook_backlog: u64,
    pub signals: Vec<HealthSignal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemHealth {
    pub status: String,
    pub version: Option<String>,
    pub uptime_seconds: u64,
    pub checks: Vec<HealthSignal>,
}

// ============================================================================
// Lookup and links
// ============================================================================

macro_rules! impl_identified {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_identified!(AdminUser, Experience, Booking, Report, AuditEvent);

fn target_link(target_type: &str, target_id: &str) -> Option<EntityLink> {
    ResourceKind::from_target_type(target_type).map(|kind| EntityLink::new(kind, target_id))
}

impl Linked for Booking {
    fn links(&self) -> Vec<EntityLink> {
        let mut links = Vec::new();
        if let Some(guest_id) = &self.guest_id {
            links.push(EntityLink::new(ResourceKind::User, guest_id.as_str()));
        }
        if let Some(experience_id) = &self.experience_id {
            links.push(EntityLink::new(
                ResourceKind::Experience,
                experience_id.as_str(),
            ));
        }
        links
    }
}

impl Linked for BookingDetail {
    fn links(&self) -> Vec<EntityLink> {
        let mut links = self.booking.links();
        links.extend(
            self.reports
                .iter()
                .map(|r| EntityLink::new(ResourceKind::Report, r.id.as_str())),
        );
        links
    }
}

impl Linked for Report {
    fn links(&self) -> Vec<EntityLink> {
        target_link(&self.target_type, &self.target_id)
            .into_iter()
            .collect()
    }
}

impl Linked for AuditEvent {
    fn links(&self) -> Vec<EntityLink> {
        target_link(&self.target_type, &self.target_id)
            .into_iter()
            .collect()
    }
}

impl Linked for UserDetail {
    fn links(&self) -> Vec<EntityLink> {
        let mut links: Vec<EntityLink> = self
            .bookings
            .iter()
            .map(|b| EntityLink::new(ResourceKind::Booking, b.id.as_str()))
            .collect();
        links.extend(
            self.experiences
                .iter()
                .map(|e| EntityLink::new(ResourceKind::Experience, e.id.as_str())),
        );
        links
    }
}
