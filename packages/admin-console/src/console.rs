//! Top-level console coordination.

use std::sync::Arc;

use futures::future::join;
use tokio::sync::watch;
use tracing::info;

use crate::actions::{ActionKey, AdminAction};
use crate::api::BaseAdminApi;
use crate::auth::{check_access, AccessCheck, AdminSession};
use crate::banners::Banners;
use crate::config::ConsoleConfig;
use crate::dispatcher::{ActionDispatcher, DispatchOutcome, PendingActions};
use crate::error::ValidationError;
use crate::prompt::BaseOperatorPrompt;
use crate::search::{self, SearchRoute};
use crate::stores::ConsoleStores;
use crate::types::{EntityLink, Filters, ResourceKind, SEARCH_FILTER};

/// What the console is currently showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Overview,
    Resource(ResourceKind),
    /// Placeholder; messaging is not managed from the console yet
    Messages,
    System,
}

/// Outcome of trying to open the console.
pub enum AccessDecision {
    Granted(Box<ConsoleController>),
    RedirectToSignIn,
    RedirectToLanding,
}

/// Owns one console session: stores, banners, pending actions, and the active
/// section. Built on entry and dropped on sign-out.
pub struct ConsoleController {
    session: AdminSession,
    stores: Arc<ConsoleStores>,
    dispatcher: ActionDispatcher,
    banners: Banners,
    section: watch::Sender<Section>,
}

impl ConsoleController {
    /// Open a console session for `session`, if its role allows it.
    pub fn open(
        session: Option<AdminSession>,
        api: Arc<dyn BaseAdminApi>,
        prompt: Arc<dyn BaseOperatorPrompt>,
        config: &ConsoleConfig,
    ) -> AccessDecision {
        match check_access(session.as_ref()) {
            AccessCheck::RedirectToSignIn => AccessDecision::RedirectToSignIn,
            AccessCheck::RedirectToLanding => AccessDecision::RedirectToLanding,
            AccessCheck::Granted => match session {
                Some(session) => {
                    AccessDecision::Granted(Box::new(Self::new(session, api, prompt, config)))
                }
                None => AccessDecision::RedirectToSignIn,
            },
        }
    }

    fn new(
        session: AdminSession,
        api: Arc<dyn BaseAdminApi>,
        prompt: Arc<dyn BaseOperatorPrompt>,
        config: &ConsoleConfig,
    ) -> Self {
        info!(user_id = %session.user_id, "Opening admin console");

        let stores = Arc::new(ConsoleStores::new(api.clone(), config));
        let banners = Banners::new();
        let dispatcher = ActionDispatcher::new(
            api,
            prompt,
            stores.clone(),
            banners.clone(),
            PendingActions::new(),
        );

        Self {
            session,
            stores,
            dispatcher,
            banners,
            section: watch::Sender::new(Section::default()),
        }
    }

    pub fn session(&self) -> &AdminSession {
        &self.session
    }

    pub fn stores(&self) -> &ConsoleStores {
        &self.stores
    }

    pub fn banners(&self) -> &Banners {
        &self.banners
    }

    pub fn is_pending(&self, key: &ActionKey) -> bool {
        self.dispatcher.pending().is_pending(key)
    }

    pub fn active_section(&self) -> Section {
        *self.section.borrow()
    }

    pub fn subscribe_section(&self) -> watch::Receiver<Section> {
        self.section.subscribe()
    }

    /// Switch sections. Stores behind the section fetch on first activation.
    pub async fn activate(&self, section: Section) {
        self.section.send_replace(section);

        match section {
            Section::Overview => {
                join(
                    self.stores.dashboard.activate(),
                    self.stores.recent_audit.activate(),
                )
                .await;
            }
            Section::Resource(kind) => self.stores.view(kind).activate().await,
            Section::System => {
                join(
                    self.stores.system_health.activate(),
                    self.stores.payments_health.activate(),
                )
                .await;
            }
            Section::Messages => {}
        }
    }

    /// Refresh every store and the recent-actions feed, waiting for all.
    pub async fn refresh_all(&self) {
        self.stores.refresh_all().await;
    }

    pub async fn dispatch(&self, entity_id: &str, action: AdminAction) -> DispatchOutcome {
        self.dispatcher.dispatch(entity_id, action).await
    }

    /// Route a global search into the matching section and fetch it.
    pub async fn search(&self, input: &str) -> Result<SearchRoute, ValidationError> {
        let route = search::classify(input)?;
        info!(kind = %route.kind, filter = %route.filter, "Routing search");

        self.section.send_replace(Section::Resource(route.kind));
        let mut patch = Filters::new();
        patch.insert(SEARCH_FILTER.to_string(), route.filter.clone());
        self.stores.view(route.kind).set_filters(patch).await;

        Ok(route)
    }

    /// Jump to a linked entity in its own section.
    pub async fn follow_link(&self, link: &EntityLink) {
        let section = Section::Resource(link.kind);

        match link.kind {
            ResourceKind::User => {
                join(
                    self.activate(section),
                    self.stores.user_detail.select(&link.id),
                )
                .await;
            }
            ResourceKind::Booking => {
                join(
                    self.activate(section),
                    self.stores.booking_detail.select(&link.id),
                )
                .await;
            }
            ResourceKind::Report => {
                self.stores.selected_report.select(&link.id);
                self.activate(section).await;
            }
            ResourceKind::AuditLog => {
                self.stores.selected_audit.select(&link.id);
                self.activate(section).await;
            }
            ResourceKind::Experience => {
                self.section.send_replace(section);
                let mut patch = Filters::new();
                patch.insert(SEARCH_FILTER.to_string(), link.id.clone());
                self.stores.experiences.set_filters(patch).await;
            }
            ResourceKind::PaymentsHealth | ResourceKind::SystemHealth => {
                self.activate(section).await
            }
        }
    }

    pub fn dismiss_banners(&self) {
        self.banners.dismiss();
    }

    /// End the session. Pending fetches that land later go nowhere.
    pub fn sign_out(self) {
        info!(user_id = %self.session.user_id, "Closing admin console");
    }
}
