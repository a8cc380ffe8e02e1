//! Core data model for the console: resource kinds, queries, and store state.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Filter name used when seeding a free-text search into a section.
pub const SEARCH_FILTER: &str = "search";

// ============================================================================
// Resource Kinds
// ============================================================================

/// The seven resource collections the console manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    User,
    Experience,
    Booking,
    Report,
    AuditLog,
    PaymentsHealth,
    SystemHealth,
}

impl ResourceKind {
    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::User,
            ResourceKind::Experience,
            ResourceKind::Booking,
            ResourceKind::Report,
            ResourceKind::AuditLog,
            ResourceKind::PaymentsHealth,
            ResourceKind::SystemHealth,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::User => "users",
            ResourceKind::Experience => "experiences",
            ResourceKind::Booking => "bookings",
            ResourceKind::Report => "reports",
            ResourceKind::AuditLog => "audit logs",
            ResourceKind::PaymentsHealth => "payments health",
            ResourceKind::SystemHealth => "system health",
        }
    }

    /// List endpoint, relative to the admin API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::User => "/users",
            ResourceKind::Experience => "/experiences",
            ResourceKind::Booking => "/bookings",
            ResourceKind::Report => "/reports",
            ResourceKind::AuditLog => "/audit-logs",
            ResourceKind::PaymentsHealth => "/payments/health",
            ResourceKind::SystemHealth => "/system/health",
        }
    }

    /// Health endpoints answer with a flat summary object instead of a page envelope.
    pub fn is_paginated(&self) -> bool {
        !matches!(
            self,
            ResourceKind::PaymentsHealth | ResourceKind::SystemHealth
        )
    }

    /// Filters a section starts with and returns to on reset.
    pub fn default_filters(&self) -> Filters {
        let mut filters = Filters::new();
        if let ResourceKind::Report = self {
            filters.insert("status".to_string(), "open".to_string());
        }
        filters
    }

    /// Map a backend `targetType` string onto a resource kind.
    pub fn from_target_type(target_type: &str) -> Option<ResourceKind> {
        match target_type.to_ascii_lowercase().as_str() {
            "user" | "users" => Some(ResourceKind::User),
            "experience" | "experiences" => Some(ResourceKind::Experience),
            "booking" | "bookings" => Some(ResourceKind::Booking),
            "report" | "reports" => Some(ResourceKind::Report),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Filter name to value. Ordered, so equality is set equality.
pub type Filters = BTreeMap<String, String>;

/// Page, limit, and filters for one list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceQuery {
    pub page: u32,
    pub limit: u32,
    pub filters: Filters,
}

impl ResourceQuery {
    pub fn new(limit: u32, filters: Filters) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            filters,
        }
    }

    /// Merge a patch into the filters. An empty value removes the filter.
    ///
    /// Any patch resets the page to 1.
    pub fn apply_patch(&mut self, patch: Filters) {
        for (name, value) in patch {
            if value.trim().is_empty() {
                self.filters.remove(&name);
            } else {
                self.filters.insert(name, value);
            }
        }
        self.page = 1;
    }

    /// Query-string parameters in a stable order.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        params.extend(
            self.filters
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        params
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Paginated envelope returned by every list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap a flat summary object so aggregate endpoints share the list shape.
    pub fn single(item: T) -> Self {
        Self {
            page: 1,
            limit: 1,
            total: 1,
            pages: 1,
            items: vec![item],
        }
    }
}

// ============================================================================
// Store State
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Snapshot of one paginated collection.
///
/// `query` is what was last requested; `page`, `limit`, `total` and `pages`
/// describe what was last loaded. Items from the last successful load stay
/// visible while a newer fetch is loading or after it has failed.
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
    pub query: ResourceQuery,
    pub status: LoadStatus,
    pub error: Option<String>,
}

impl<T> ResourceState<T> {
    pub fn idle(query: ResourceQuery) -> Self {
        Self {
            items: Vec::new(),
            page: query.page,
            limit: query.limit,
            total: 0,
            pages: 0,
            query,
            status: LoadStatus::Idle,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }
}

/// Snapshot of one selected entity's expanded view.
#[derive(Debug, Clone)]
pub struct DetailState<T> {
    pub selected: Option<String>,
    pub data: Option<T>,
    pub status: LoadStatus,
    pub error: Option<String>,
}

impl<T> Default for DetailState<T> {
    fn default() -> Self {
        Self {
            selected: None,
            data: None,
            status: LoadStatus::Idle,
            error: None,
        }
    }
}

// ============================================================================
// Cross-links
// ============================================================================

/// Reference from one entity to another, possibly of a different kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityLink {
    pub kind: ResourceKind,
    pub id: String,
}

impl EntityLink {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// Entities that can be looked up by id inside a loaded page.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Entities that reference other entities.
pub trait Linked {
    fn links(&self) -> Vec<EntityLink>;
}
