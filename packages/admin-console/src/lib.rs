//! # Admin Console
//!
//! Data and control layer behind the marketplace admin operations console.
//! Rendering lives elsewhere; this crate owns the state a renderer draws from
//! and the rules for changing it.
//!
//! ## Architecture
//!
//! ```text
//! ConsoleController ── activate / search / follow_link ──► ResourceStore (x9)
//!     │                                                     DetailStore  (x2)
//!     │                                                     SelectionProjection (x2)
//!     │
//!     └─ dispatch(id, action) ─► ActionDispatcher
//!                                   │ guard: one in-flight call per ActionKey
//!                                   │ gate:  confirmation + reason for critical actions
//!                                   ▼
//!                                BaseAdminApi::mutate
//!                                   │ ok
//!                                   ▼
//!                                invalidation graph ─► refresh dependent stores
//! ```
//!
//! ## Invariants
//!
//! 1. **Stores own their state** - only a store's own fetch completion writes it
//! 2. **Latest request wins** - late results for superseded queries or selections are dropped
//! 3. **Filter changes reset paging** - page-only changes keep filters
//! 4. **Busy means dropped** - a second dispatch of an in-flight key does nothing
//! 5. **No reason, no request** - critical actions never reach the network without one
//!
//! ## Example
//!
//! ```rust,ignore
//! use admin_console::{ConsoleController, ConsoleConfig, HttpAdminApi, TerminalPrompt, AccessDecision};
//!
//! let config = ConsoleConfig::from_env()?;
//! let api = Arc::new(HttpAdminApi::from_config(&config));
//!
//! let AccessDecision::Granted(console) =
//!     ConsoleController::open(session, api, Arc::new(TerminalPrompt::new()), &config)
//! else {
//!     return redirect();
//! };
//!
//! console.search("report: spam host").await?;
//! console.dispatch("u123", AdminAction::User(UserAction::Ban)).await;
//! ```

pub mod actions;
pub mod api;
pub mod auth;
pub mod banners;
pub mod config;
pub mod console;
pub mod dispatcher;
pub mod error;
pub mod invalidation;
pub mod models;
pub mod prompt;
pub mod search;
pub mod stores;
pub mod testing;
pub mod types;

pub use actions::{
    ActionKey, AdminAction, BookingAction, CriticalPrompt, ExperienceAction, ReportAction,
    UserAction,
};
pub use api::{BaseAdminApi, HttpAdminApi, MutationMethod, MutationRequest};
pub use auth::AdminSession;
pub use banners::{BannerState, Banners};
pub use config::ConsoleConfig;
pub use console::{AccessDecision, ConsoleController, Section};
pub use dispatcher::{ActionDispatcher, DispatchOutcome, PendingActions};
pub use error::{ApiError, ConsoleError, ValidationError};
pub use prompt::{BaseOperatorPrompt, TerminalPrompt};
pub use search::{classify, SearchRoute};
pub use stores::{ConsoleStores, DetailStore, ResourceStore, ResourceView, SelectionProjection};
pub use types::{EntityLink, Filters, LoadStatus, ResourceKind, ResourceQuery, ResourceState};
