//! Invalidation graph: which stores refetch after a successful action.

use futures::future::{join_all, BoxFuture, FutureExt};
use tracing::info;

use crate::stores::ConsoleStores;
use crate::types::ResourceKind;

/// A store that may need to refetch after a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidationTarget {
    List(ResourceKind),
    Dashboard,
    RecentAudit,
    /// Only when the mutated user is the one open in the detail view
    UserDetail,
    /// Only when the mutated booking is the one open in the detail view
    BookingDetail,
}

/// Static edges from a mutated resource kind to dependent stores.
pub fn targets_for(kind: ResourceKind) -> &'static [InvalidationTarget] {
    use InvalidationTarget::*;

    match kind {
        ResourceKind::User => &[
            List(ResourceKind::User),
            Dashboard,
            UserDetail,
            RecentAudit,
        ],
        ResourceKind::Experience => &[List(ResourceKind::Experience), Dashboard, RecentAudit],
        ResourceKind::Booking => &[
            List(ResourceKind::Booking),
            BookingDetail,
            List(ResourceKind::PaymentsHealth),
            Dashboard,
            RecentAudit,
        ],
        // Report actions can pause an experience or suspend a user
        ResourceKind::Report => &[
            List(ResourceKind::Report),
            List(ResourceKind::Experience),
            List(ResourceKind::User),
            Dashboard,
            RecentAudit,
        ],
        ResourceKind::AuditLog | ResourceKind::PaymentsHealth | ResourceKind::SystemHealth => &[],
    }
}

/// Run the graph for a completed action on `entity_id`.
///
/// Targets refetch concurrently; one failing does not stop the others.
/// Returns the targets that were actually refreshed.
pub async fn invalidate(
    stores: &ConsoleStores,
    kind: ResourceKind,
    entity_id: &str,
) -> Vec<InvalidationTarget> {
    let mut fired = Vec::new();
    let mut refetches: Vec<BoxFuture<'_, ()>> = Vec::new();

    for target in targets_for(kind) {
        match target {
            InvalidationTarget::List(list) => refetches.push(stores.view(*list).refresh()),
            InvalidationTarget::Dashboard => refetches.push(stores.dashboard.refresh().boxed()),
            InvalidationTarget::RecentAudit => {
                refetches.push(stores.recent_audit.refresh().boxed())
            }
            InvalidationTarget::UserDetail => {
                if !stores.user_detail.is_selected(entity_id) {
                    continue;
                }
                refetches.push(stores.user_detail.reload().boxed());
            }
            InvalidationTarget::BookingDetail => {
                if !stores.booking_detail.is_selected(entity_id) {
                    continue;
                }
                refetches.push(stores.booking_detail.reload().boxed());
            }
        }
        fired.push(*target);
    }

    info!(%kind, entity_id, targets = fired.len(), "Invalidating dependent stores");
    join_all(refetches).await;
    fired
}
