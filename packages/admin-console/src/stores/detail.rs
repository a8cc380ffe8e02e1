//! Single-entity detail store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::BaseAdminApi;
use crate::error::{ApiResult, ConsoleError};
use crate::types::{DetailState, LoadStatus};

/// Loads and holds the expanded view of one selected entity.
///
/// Each load is tagged with the id it was issued for and a ticket. Results
/// are applied only while that id is still selected and no newer load has
/// been issued.
pub struct DetailStore<T> {
    label: &'static str,
    base_path: &'static str,
    api: Arc<dyn BaseAdminApi>,
    latest: AtomicU64,
    state: watch::Sender<DetailState<T>>,
}

impl<T> DetailStore<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(label: &'static str, base_path: &'static str, api: Arc<dyn BaseAdminApi>) -> Self {
        Self {
            label,
            base_path,
            api,
            latest: AtomicU64::new(0),
            state: watch::Sender::new(DetailState::default()),
        }
    }

    pub fn state(&self) -> DetailState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState<T>> {
        self.state.subscribe()
    }

    pub fn selected(&self) -> Option<String> {
        self.state.borrow().selected.clone()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.state.borrow().selected.as_deref() == Some(id)
    }

    /// Select `id` and load it. Selecting the current id again reloads it.
    pub async fn select(&self, id: &str) {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            if state.selected.as_deref() != Some(id) {
                state.data = None;
            }
            state.selected = Some(id.to_string());
            state.status = LoadStatus::Loading;
            state.error = None;
        });

        info!(store = self.label, id, "Loading detail");

        let path = format!("{}/{}", self.base_path, id);
        let result: ApiResult<T> = match self.api.get(&path, &[]).await {
            Ok(value) => serde_json::from_value(value).map_err(Into::into),
            Err(e) => Err(e),
        };

        self.state.send_if_modified(|state| {
            if state.selected.as_deref() != Some(id)
                || self.latest.load(Ordering::SeqCst) != ticket
            {
                debug!(store = self.label, id, "Dropping stale detail");
                return false;
            }

            match result {
                Ok(data) => {
                    state.data = Some(data);
                    state.status = LoadStatus::Loaded;
                }
                Err(e) => {
                    warn!(error = %ConsoleError::fetch_failed(self.label, e.clone()), id, "Detail load failed");
                    state.status = LoadStatus::Errored;
                    state.error = Some(e.to_string());
                }
            }
            true
        });
    }

    /// Reload the current selection, if any.
    pub async fn reload(&self) {
        if let Some(id) = self.selected() {
            self.select(&id).await;
        }
    }

    /// Deselect. An in-flight load for the old id is discarded when it lands.
    pub fn clear(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|state| *state = DetailState::default());
    }
}
