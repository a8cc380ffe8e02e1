//! Paginated, filterable collection store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::BaseAdminApi;
use crate::error::{ApiError, ApiResult, ConsoleError, ValidationError};
use crate::types::{Filters, LoadStatus, Page, ResourceKind, ResourceQuery, ResourceState};

/// Where a store reads from and how the response is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    pub label: &'static str,
    pub path: &'static str,
    pub paginated: bool,
}

impl Collection {
    pub fn of(kind: ResourceKind) -> Self {
        Self {
            label: kind.label(),
            path: kind.path(),
            paginated: kind.is_paginated(),
        }
    }

    /// `GET /dashboard`: flat summary.
    pub fn dashboard() -> Self {
        Self {
            label: "dashboard",
            path: "/dashboard",
            paginated: false,
        }
    }

    /// `GET /audit-logs/recent`: the recent-actions feed.
    pub fn recent_audit() -> Self {
        Self {
            label: "recent actions",
            path: "/audit-logs/recent",
            paginated: true,
        }
    }

    fn decode<T: DeserializeOwned>(&self, value: serde_json::Value) -> ApiResult<Page<T>> {
        if self.paginated {
            Ok(serde_json::from_value(value)?)
        } else {
            Ok(Page::single(serde_json::from_value(value)?))
        }
    }
}

/// Type-erased view of a list store, used for fan-out and section routing.
#[async_trait]
pub trait ResourceView: Send + Sync {
    fn label(&self) -> &'static str;

    fn status(&self) -> LoadStatus;

    /// Re-fetch with the current query.
    async fn refresh(&self);

    /// Fetch if the store has never been loaded.
    async fn activate(&self);

    async fn set_filters(&self, patch: Filters);

    async fn reset(&self);
}

/// Owns one collection's fetch lifecycle.
///
/// Every fetch takes a ticket. A completion is applied only if its ticket is
/// still the latest one issued, so a slow response can never overwrite the
/// result of a newer query.
pub struct ResourceStore<T> {
    collection: Collection,
    api: Arc<dyn BaseAdminApi>,
    defaults: ResourceQuery,
    latest: AtomicU64,
    state: watch::Sender<ResourceState<T>>,
}

impl<T> ResourceStore<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(collection: Collection, api: Arc<dyn BaseAdminApi>, defaults: ResourceQuery) -> Self {
        Self {
            collection,
            api,
            state: watch::Sender::new(ResourceState::idle(defaults.clone())),
            defaults,
            latest: AtomicU64::new(0),
        }
    }

    pub fn for_kind(kind: ResourceKind, api: Arc<dyn BaseAdminApi>, limit: u32) -> Self {
        Self::new(
            Collection::of(kind),
            api,
            ResourceQuery::new(limit, kind.default_filters()),
        )
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Current snapshot.
    pub fn state(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    /// Query that the next refresh will send.
    pub fn query(&self) -> ResourceQuery {
        self.state.borrow().query.clone()
    }

    /// Watch for state changes.
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.state.subscribe()
    }

    /// Merge `patch` into the filters, go back to page 1, and fetch.
    pub async fn set_filters(&self, patch: Filters) {
        if patch.is_empty() {
            return;
        }
        self.load(|query| query.apply_patch(patch)).await;
    }

    /// Move to page `page` without touching filters.
    ///
    /// Pages outside `1..=pages` are rejected without a fetch.
    pub async fn set_page(&self, page: u32) -> Result<(), ValidationError> {
        let pages = self.state.borrow().pages.max(1);
        if page == 0 || page > pages {
            return Err(ValidationError::PageOutOfRange {
                requested: page,
                pages,
            });
        }
        self.load(|query| query.page = page).await;
        Ok(())
    }

    /// Re-fetch with the current query.
    pub async fn refresh(&self) {
        self.load(|_| {}).await;
    }

    /// Restore default filters and fetch page 1.
    pub async fn reset(&self) {
        let defaults = self.defaults.clone();
        self.load(move |query| *query = defaults).await;
    }

    /// Fetch on first activation only.
    pub async fn activate(&self) {
        if self.state.borrow().status == LoadStatus::Idle {
            self.refresh().await;
        }
    }

    async fn load(&self, update: impl FnOnce(&mut ResourceQuery)) {
        // Ticket and query come from the same write
        let mut ticket = 0;
        let mut query = self.defaults.clone();
        self.state.send_modify(|state| {
            update(&mut state.query);
            state.status = LoadStatus::Loading;
            state.error = None;
            ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            query = state.query.clone();
        });

        info!(
            store = self.collection.label,
            page = query.page,
            filters = query.filters.len(),
            "Fetching"
        );

        let result = match self.api.get(self.collection.path, &query.to_params()).await {
            Ok(value) => self.collection.decode::<T>(value),
            Err(e) => Err(e),
        };

        self.apply(ticket, result);
    }

    fn apply(&self, ticket: u64, result: Result<Page<T>, ApiError>) {
        self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) != ticket {
                debug!(store = self.collection.label, ticket, "Dropping stale result");
                return false;
            }

            match result {
                Ok(page) => {
                    debug!(
                        store = self.collection.label,
                        items = page.items.len(),
                        total = page.total,
                        "Loaded"
                    );
                    state.items = page.items;
                    state.page = page.page;
                    state.limit = page.limit;
                    state.total = page.total;
                    state.pages = page.pages;
                    state.status = LoadStatus::Loaded;
                    state.error = None;
                }
                Err(e) => {
                    warn!(error = %ConsoleError::fetch_failed(self.collection.label, e.clone()), "Fetch failed");
                    state.status = LoadStatus::Errored;
                    state.error = Some(e.to_string());
                }
            }
            true
        });
    }
}

#[async_trait]
impl<T> ResourceView for ResourceStore<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn label(&self) -> &'static str {
        self.collection.label
    }

    fn status(&self) -> LoadStatus {
        self.state.borrow().status
    }

    async fn refresh(&self) {
        ResourceStore::refresh(self).await
    }

    async fn activate(&self) {
        ResourceStore::activate(self).await
    }

    async fn set_filters(&self, patch: Filters) {
        ResourceStore::set_filters(self, patch).await
    }

    async fn reset(&self) {
        ResourceStore::reset(self).await
    }
}
