//! Action dispatcher: the gatekeeper for every mutating call.
//!
//! ```text
//! dispatch(id, action)
//!     │
//!     ├─ key pending? ──────────────► Busy (dropped, nothing queued)
//!     │
//!     ├─ critical? ─► prompt ─ declined / blank reason ─► Rejected (no network)
//!     │
//!     ├─ mark pending, clear banners
//!     │
//!     ├─ api.mutate()
//!     │     ├─ Ok  ─► info banner, release key, run invalidation graph
//!     │     └─ Err ─► error banner, release key
//!     ▼
//! ```

use std::sync::Arc;

use dashmap::DashSet;
use tracing::{debug, info, warn};

use crate::actions::{ActionKey, AdminAction, CriticalPrompt};
use crate::api::BaseAdminApi;
use crate::banners::Banners;
use crate::error::{ConsoleError, ValidationError};
use crate::invalidation;
use crate::prompt::BaseOperatorPrompt;
use crate::stores::ConsoleStores;

/// What happened to one `dispatch` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Mutation succeeded and dependent stores were refreshed
    Completed,
    /// Same key already in flight; the call was dropped
    Busy,
    /// Stopped locally before any network call
    Rejected(ValidationError),
    /// The backend or transport failed; carries the banner message
    Failed(String),
}

// =============================================================================
// Pending set
// =============================================================================

/// Set of in-flight action keys.
#[derive(Clone, Default)]
pub struct PendingActions {
    keys: Arc<DashSet<ActionKey>>,
}

impl PendingActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a control for `key` should render as busy.
    pub fn is_pending(&self, key: &ActionKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Claim `key`, or `None` if it is already in flight.
    fn try_claim(&self, key: ActionKey) -> Option<PendingGuard> {
        if self.keys.insert(key.clone()) {
            Some(PendingGuard {
                keys: self.keys.clone(),
                key,
            })
        } else {
            None
        }
    }
}

/// Releases its key on drop, so a key is freed on every exit path.
struct PendingGuard {
    keys: Arc<DashSet<ActionKey>>,
    key: ActionKey,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.keys.remove(&self.key);
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

pub struct ActionDispatcher {
    api: Arc<dyn BaseAdminApi>,
    prompt: Arc<dyn BaseOperatorPrompt>,
    stores: Arc<ConsoleStores>,
    banners: Banners,
    pending: PendingActions,
}

impl ActionDispatcher {
    pub fn new(
        api: Arc<dyn BaseAdminApi>,
        prompt: Arc<dyn BaseOperatorPrompt>,
        stores: Arc<ConsoleStores>,
        banners: Banners,
        pending: PendingActions,
    ) -> Self {
        Self {
            api,
            prompt,
            stores,
            banners,
            pending,
        }
    }

    pub fn pending(&self) -> &PendingActions {
        &self.pending
    }

    pub async fn dispatch(&self, entity_id: &str, action: AdminAction) -> DispatchOutcome {
        let key = ActionKey::new(entity_id, &action);

        if self.pending.is_pending(&key) {
            debug!(%key, "Action already in flight, dropping");
            return DispatchOutcome::Busy;
        }

        let reason = if action.requires_reason() {
            match self.obtain_reason(entity_id, &action) {
                Ok(reason) => Some(reason),
                Err(e) => {
                    warn!(%key, error = %e, "Critical action aborted");
                    self.banners.set_error(ConsoleError::from(e.clone()).to_string());
                    return DispatchOutcome::Rejected(e);
                }
            }
        } else {
            None
        };

        let Some(guard) = self.pending.try_claim(key.clone()) else {
            debug!(%key, "Action claimed concurrently, dropping");
            return DispatchOutcome::Busy;
        };
        self.banners.dismiss();

        info!(%key, "Dispatching action");
        let request = action.request(entity_id, reason.as_deref());
        let result = self.api.mutate(&request).await;

        match result {
            Ok(_) => {
                self.banners.set_info(format!(
                    "{} {}: {} done",
                    action.kind().label(),
                    entity_id,
                    action.describe()
                ));
                drop(guard);
                invalidation::invalidate(&self.stores, action.kind(), entity_id).await;
                DispatchOutcome::Completed
            }
            Err(e) => {
                let message = ConsoleError::ActionFailed(e).to_string();
                warn!(%key, error = %message, "Action failed");
                self.banners.set_error(message.clone());
                drop(guard);
                DispatchOutcome::Failed(message)
            }
        }
    }

    fn obtain_reason(&self, entity_id: &str, action: &AdminAction) -> Result<String, ValidationError> {
        let answer = self
            .prompt
            .confirm_critical(&CriticalPrompt::new(entity_id, action))
            .ok_or(ValidationError::ConfirmationDeclined)?;

        let reason = answer.trim();
        if reason.is_empty() {
            return Err(ValidationError::ReasonRequired);
        }
        Ok(reason.to_string())
    }
}
