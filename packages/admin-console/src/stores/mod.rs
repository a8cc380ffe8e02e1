//! Console state stores.
//!
//! Each store owns its state exclusively. Other components ask a store to
//! refetch through its own API and never write its state directly.

mod detail;
mod projection;
mod resource;

pub use detail::DetailStore;
pub use projection::SelectionProjection;
pub use resource::{Collection, ResourceStore, ResourceView};

use std::sync::Arc;

use futures::future::join_all;
use tracing::info;

use crate::api::BaseAdminApi;
use crate::config::ConsoleConfig;
use crate::models::{
    AdminUser, AuditEvent, Booking, BookingDetail, DashboardSummary, Experience, PaymentsHealth,
    Report, SystemHealth, UserDetail,
};
use crate::types::{ResourceKind, ResourceQuery};

/// Every store behind one console session.
pub struct ConsoleStores {
    pub users: Arc<ResourceStore<AdminUser>>,
    pub experiences: Arc<ResourceStore<Experience>>,
    pub bookings: Arc<ResourceStore<Booking>>,
    pub reports: Arc<ResourceStore<Report>>,
    pub audit_logs: Arc<ResourceStore<AuditEvent>>,
    pub payments_health: Arc<ResourceStore<PaymentsHealth>>,
    pub system_health: Arc<ResourceStore<SystemHealth>>,

    pub dashboard: Arc<ResourceStore<DashboardSummary>>,
    pub recent_audit: Arc<ResourceStore<AuditEvent>>,

    pub user_detail: DetailStore<UserDetail>,
    pub booking_detail: DetailStore<BookingDetail>,
    pub selected_report: SelectionProjection<Report>,
    pub selected_audit: SelectionProjection<AuditEvent>,
}

impl ConsoleStores {
    pub fn new(api: Arc<dyn BaseAdminApi>, config: &ConsoleConfig) -> Self {
        let limit = config.page_limit;

        let reports = Arc::new(ResourceStore::for_kind(ResourceKind::Report, api.clone(), limit));
        let audit_logs = Arc::new(ResourceStore::for_kind(ResourceKind::AuditLog, api.clone(), limit));

        Self {
            users: Arc::new(ResourceStore::for_kind(ResourceKind::User, api.clone(), limit)),
            experiences: Arc::new(ResourceStore::for_kind(ResourceKind::Experience, api.clone(), limit)),
            bookings: Arc::new(ResourceStore::for_kind(ResourceKind::Booking, api.clone(), limit)),
            payments_health: Arc::new(ResourceStore::for_kind(
                ResourceKind::PaymentsHealth,
                api.clone(),
                limit,
            )),
            system_health: Arc::new(ResourceStore::for_kind(
                ResourceKind::SystemHealth,
                api.clone(),
                limit,
            )),
            dashboard: Arc::new(ResourceStore::new(
                Collection::dashboard(),
                api.clone(),
                ResourceQuery::new(1, Default::default()),
            )),
            recent_audit: Arc::new(ResourceStore::new(
                Collection::recent_audit(),
                api.clone(),
                ResourceQuery::new(config.audit_feed_limit, Default::default()),
            )),
            user_detail: DetailStore::new("user detail", "/users", api.clone()),
            booking_detail: DetailStore::new("booking detail", "/bookings", api),
            selected_report: SelectionProjection::new(reports.clone()),
            selected_audit: SelectionProjection::new(audit_logs.clone()),
            reports,
            audit_logs,
        }
    }

    /// List store for a resource kind.
    pub fn view(&self, kind: ResourceKind) -> &dyn ResourceView {
        match kind {
            ResourceKind::User => self.users.as_ref(),
            ResourceKind::Experience => self.experiences.as_ref(),
            ResourceKind::Booking => self.bookings.as_ref(),
            ResourceKind::Report => self.reports.as_ref(),
            ResourceKind::AuditLog => self.audit_logs.as_ref(),
            ResourceKind::PaymentsHealth => self.payments_health.as_ref(),
            ResourceKind::SystemHealth => self.system_health.as_ref(),
        }
    }

    /// All seven resource lists plus the dashboard and recent-actions feed.
    pub fn all_views(&self) -> Vec<&dyn ResourceView> {
        let mut views: Vec<&dyn ResourceView> = ResourceKind::all()
            .iter()
            .map(|kind| self.view(*kind))
            .collect();
        views.push(self.dashboard.as_ref());
        views.push(self.recent_audit.as_ref());
        views
    }

    /// Refresh every list concurrently and wait for all of them to settle.
    ///
    /// A failed fetch only shows up in its own store's error state.
    pub async fn refresh_all(&self) {
        let views = self.all_views();
        info!(stores = views.len(), "Refreshing all stores");
        join_all(views.iter().map(|view| view.refresh())).await;
    }
}
