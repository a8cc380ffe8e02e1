//! Global action banners.

use std::sync::Arc;

use tokio::sync::watch;

/// The console's single error/info banner pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannerState {
    pub action_error: Option<String>,
    pub action_info: Option<String>,
}

/// Shared handle to the session's banners. Last write wins.
#[derive(Clone)]
pub struct Banners {
    state: Arc<watch::Sender<BannerState>>,
}

impl Banners {
    pub fn new() -> Self {
        Self {
            state: Arc::new(watch::Sender::new(BannerState::default())),
        }
    }

    pub fn current(&self) -> BannerState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BannerState> {
        self.state.subscribe()
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.state.send_replace(BannerState {
            action_error: Some(message.into()),
            action_info: None,
        });
    }

    pub fn set_info(&self, message: impl Into<String>) {
        self.state.send_replace(BannerState {
            action_error: None,
            action_info: Some(message.into()),
        });
    }

    /// Clear both banners.
    pub fn dismiss(&self) {
        self.state.send_if_modified(|state| {
            if *state == BannerState::default() {
                return false;
            }
            *state = BannerState::default();
            true
        });
    }
}

impl Default for Banners {
    fn default() -> Self {
        Self::new()
    }
}
