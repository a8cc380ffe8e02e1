mod common;

use std::sync::Arc;

use admin_console::models::UserRole;
use admin_console::testing::{MockAdminApi, ScriptedPrompt};
use admin_console::{
    AccessDecision, AdminSession, ApiError, ConsoleConfig, ConsoleController, EntityLink,
    Filters, LoadStatus, ResourceKind, Section, ValidationError,
};

use common::*;

fn patch(name: &str, value: &str) -> Filters {
    let mut filters = Filters::new();
    filters.insert(name.to_string(), value.to_string());
    filters
}

// =============================================================================
// Access gate
// =============================================================================

#[test]
fn test_console_requires_admin_session() {
    let api = Arc::new(MockAdminApi::new());
    let prompt = Arc::new(ScriptedPrompt::new());
    let config = ConsoleConfig::default();

    assert!(matches!(
        ConsoleController::open(None, api.clone(), prompt.clone(), &config),
        AccessDecision::RedirectToSignIn
    ));

    let host = AdminSession {
        role: UserRole::Host,
        ..admin_session()
    };
    assert!(matches!(
        ConsoleController::open(Some(host), api, prompt, &config),
        AccessDecision::RedirectToLanding
    ));
}

// =============================================================================
// Sections and paging
// =============================================================================

#[tokio::test]
async fn test_sections_fetch_on_first_activation_only() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));

    assert_eq!(console.active_section(), Section::Overview);
    assert_eq!(console.stores().users.state().status, LoadStatus::Idle);

    console.activate(Section::Resource(ResourceKind::User)).await;
    console.activate(Section::Resource(ResourceKind::User)).await;

    assert_eq!(console.active_section(), Section::Resource(ResourceKind::User));
    assert_eq!(api.get_count("/users"), 1);
    assert_eq!(console.stores().users.state().status, LoadStatus::Loaded);

    console.activate(Section::System).await;
    assert_eq!(api.get_count("/system/health"), 1);
    assert_eq!(api.get_count("/payments/health"), 1);
}

#[tokio::test]
async fn test_filter_change_resets_page_for_every_list() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));
    let stores = console.stores();
    console.refresh_all().await;

    stores.users.set_page(3).await.unwrap();
    stores.experiences.set_page(2).await.unwrap();
    stores.bookings.set_page(4).await.unwrap();
    stores.reports.set_page(2).await.unwrap();
    stores.audit_logs.set_page(2).await.unwrap();

    for kind in [
        ResourceKind::User,
        ResourceKind::Experience,
        ResourceKind::Booking,
        ResourceKind::Report,
        ResourceKind::AuditLog,
    ] {
        stores.view(kind).set_filters(patch("search", "x")).await;
    }

    assert_eq!(stores.users.query().page, 1);
    assert_eq!(stores.experiences.query().page, 1);
    assert_eq!(stores.bookings.query().page, 1);
    assert_eq!(stores.reports.query().page, 1);
    assert_eq!(stores.audit_logs.query().page, 1);
}

#[tokio::test]
async fn test_out_of_order_completion_across_kinds() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));
    let stores = console.stores();

    api.hold("/users");
    tokio::join!(stores.users.refresh(), async {
        api.wait_for_gets("/users", 1).await;
        // Issued later, finishes first
        stores.bookings.refresh().await;
        assert_eq!(stores.bookings.state().status, LoadStatus::Loaded);
        assert_eq!(stores.users.state().status, LoadStatus::Loading);
        api.release("/users");
    });

    assert_eq!(stores.users.state().status, LoadStatus::Loaded);
    assert_eq!(stores.users.state().items.len(), 2);
}

// =============================================================================
// Refresh all
// =============================================================================

#[tokio::test]
async fn test_refresh_all_settles_every_store() {
    let api = seeded_api();
    api.fail("/users", ApiError::Network("connection reset".to_string()));
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));

    console.refresh_all().await;

    let stores = console.stores();
    let users = stores.users.state();
    assert_eq!(users.status, LoadStatus::Errored);
    assert_eq!(users.error.as_deref(), Some("Network error: connection reset"));

    for view in stores.all_views() {
        if view.label() == "users" {
            continue;
        }
        assert_eq!(view.status(), LoadStatus::Loaded, "{} should be loaded", view.label());
    }
    assert_eq!(api.get_count("/audit-logs/recent"), 1);
    assert_eq!(api.get_count("/dashboard"), 1);
}

// =============================================================================
// Search routing
// =============================================================================

#[tokio::test]
async fn test_search_routes_email_to_users() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));

    let route = console.search("a@b.com").await.unwrap();

    assert_eq!(route.kind, ResourceKind::User);
    assert_eq!(console.active_section(), Section::Resource(ResourceKind::User));
    let query = console.stores().users.query();
    assert_eq!(query.page, 1);
    assert_eq!(query.filters.get("search").map(String::as_str), Some("a@b.com"));
    assert_eq!(api.get_count("/users"), 1);
}

#[tokio::test]
async fn test_search_routes_report_prefix() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));

    console.search("report: spam host").await.unwrap();

    assert_eq!(console.active_section(), Section::Resource(ResourceKind::Report));
    let params = api.last_get("/reports").unwrap();
    assert!(params.contains(&("search".to_string(), "spam host".to_string())));
    assert!(params.contains(&("page".to_string(), "1".to_string())));
}

#[tokio::test]
async fn test_search_routes_ids_and_free_text() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));

    console.search(BOOKING_ID).await.unwrap();
    assert_eq!(console.active_section(), Section::Resource(ResourceKind::Booking));
    assert_eq!(
        console.stores().bookings.query().filters.get("search").map(String::as_str),
        Some(BOOKING_ID)
    );

    console.search("sunset kayaking").await.unwrap();
    assert_eq!(console.active_section(), Section::Resource(ResourceKind::Experience));
    assert_eq!(
        console.stores().experiences.query().filters.get("search").map(String::as_str),
        Some("sunset kayaking")
    );
}

#[tokio::test]
async fn test_bare_report_search_clears_text_filter() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));

    console.search("report: spam host").await.unwrap();
    let route = console.search("report:").await.unwrap();

    assert_eq!(route.kind, ResourceKind::Report);
    assert_eq!(route.filter, "");
    let query = console.stores().reports.query();
    assert!(query.filters.get("search").is_none());
    assert_eq!(query.filters.get("status").map(String::as_str), Some("open"));
    assert_eq!(api.get_count("/reports"), 2);
}

#[tokio::test]
async fn test_empty_search_is_a_no_op() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));

    assert_eq!(console.search("").await, Err(ValidationError::EmptySearch));

    assert_eq!(console.active_section(), Section::Overview);
    assert!(api.calls().is_empty());
}

// =============================================================================
// Detail and cross-links
// =============================================================================

#[tokio::test]
async fn test_detail_keeps_latest_selection() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));
    let detail = &console.stores().user_detail;

    api.hold("/users/u1");
    tokio::join!(detail.select("u1"), async {
        api.wait_for_gets("/users/u1", 1).await;
        detail.select("u2").await;
        api.release("/users/u1");
    });

    let state = detail.state();
    assert_eq!(state.selected.as_deref(), Some("u2"));
    assert_eq!(state.data.unwrap().user.id, "u2");
}

#[tokio::test]
async fn test_detail_error_leaves_list_untouched() {
    let api = seeded_api();
    api.fail("/users/u2", ApiError::Api {
        status: 500,
        message: "Detail unavailable".to_string(),
    });
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));

    console.activate(Section::Resource(ResourceKind::User)).await;
    console.stores().user_detail.select("u2").await;

    assert_eq!(console.stores().user_detail.state().status, LoadStatus::Errored);
    assert_eq!(console.stores().users.state().status, LoadStatus::Loaded);
}

#[tokio::test]
async fn test_follow_links_across_kinds() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));
    let stores = console.stores();

    console.activate(Section::Resource(ResourceKind::AuditLog)).await;
    let event = stores.audit_logs.state().items[0].clone();
    let link = admin_console::types::Linked::links(&event).remove(0);
    assert_eq!(link, EntityLink::new(ResourceKind::User, "u1"));

    console.follow_link(&link).await;
    assert_eq!(console.active_section(), Section::Resource(ResourceKind::User));
    assert_eq!(stores.user_detail.state().data.unwrap().user.id, "u1");

    console
        .follow_link(&EntityLink::new(ResourceKind::Report, "r1"))
        .await;
    assert_eq!(console.active_section(), Section::Resource(ResourceKind::Report));
    assert_eq!(stores.selected_report.current().unwrap().reason, "spam host");

    console
        .follow_link(&EntityLink::new(ResourceKind::Experience, "e1"))
        .await;
    assert_eq!(
        stores.experiences.query().filters.get("search").map(String::as_str),
        Some("e1")
    );
}

#[tokio::test]
async fn test_following_detail_link_loads_its_list() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));
    let stores = console.stores();

    console
        .follow_link(&EntityLink::new(ResourceKind::User, "u1"))
        .await;
    assert_eq!(stores.users.state().status, LoadStatus::Loaded);
    assert_eq!(api.get_count("/users"), 1);
    assert_eq!(stores.user_detail.state().data.unwrap().user.id, "u1");

    console
        .follow_link(&EntityLink::new(ResourceKind::Booking, BOOKING_ID))
        .await;
    assert_eq!(console.active_section(), Section::Resource(ResourceKind::Booking));
    assert_eq!(stores.bookings.state().status, LoadStatus::Loaded);
    assert_eq!(api.get_count("/bookings"), 1);
    assert_eq!(
        stores.booking_detail.state().data.unwrap().booking.id,
        BOOKING_ID
    );

    // Already loaded lists are not refetched
    console
        .follow_link(&EntityLink::new(ResourceKind::User, "u2"))
        .await;
    assert_eq!(api.get_count("/users"), 1);
}
