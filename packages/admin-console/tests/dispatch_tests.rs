mod common;

use std::sync::Arc;

use admin_console::models::UserRole;
use admin_console::testing::ScriptedPrompt;
use admin_console::{
    ActionKey, AdminAction, ApiError, BookingAction, DispatchOutcome, LoadStatus, ReportAction,
    UserAction, ValidationError,
};

use common::*;

fn change_role(role: UserRole) -> AdminAction {
    AdminAction::User(UserAction::ChangeRole(role))
}

// =============================================================================
// Concurrency guard
// =============================================================================

#[tokio::test]
async fn test_second_dispatch_of_same_key_is_dropped() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));
    let key = ActionKey::new("u1", &change_role(UserRole::Host));

    api.hold("/users/u1/role");
    let (first, second) = tokio::join!(console.dispatch("u1", change_role(UserRole::Host)), async {
        api.wait_for_mutations(1).await;
        assert!(console.is_pending(&key));
        let second = console.dispatch("u1", change_role(UserRole::Admin)).await;
        api.release("/users/u1/role");
        second
    });

    assert_eq!(first, DispatchOutcome::Completed);
    assert_eq!(second, DispatchOutcome::Busy);
    assert_eq!(api.mutations().len(), 1);
    assert!(!console.is_pending(&key));
}

#[tokio::test]
async fn test_busy_critical_action_does_not_prompt_again() {
    let api = seeded_api();
    let prompt = Arc::new(
        ScriptedPrompt::new()
            .answer("chargeback fraud")
            .answer("chargeback fraud"),
    );
    let console = open_console(api.clone(), prompt.clone());
    let ban = AdminAction::User(UserAction::Ban);

    api.hold("/users/u1/ban");
    let (first, second) = tokio::join!(console.dispatch("u1", ban), async {
        api.wait_for_mutations(1).await;
        let second = console.dispatch("u1", ban).await;
        api.release("/users/u1/ban");
        second
    });

    assert_eq!(first, DispatchOutcome::Completed);
    assert_eq!(second, DispatchOutcome::Busy);
    assert_eq!(prompt.prompt_count(), 1);
    assert_eq!(api.mutations().len(), 1);
}

#[tokio::test]
async fn test_distinct_keys_run_concurrently() {
    let api = seeded_api();
    let prompt = Arc::new(ScriptedPrompt::new().answer("chargeback fraud"));
    let console = open_console(api.clone(), prompt);

    api.hold("/users/u1/role");
    let (role, ban) = tokio::join!(console.dispatch("u1", change_role(UserRole::Host)), async {
        api.wait_for_mutations(1).await;
        // Same entity, different action
        let ban = console.dispatch("u1", AdminAction::User(UserAction::Ban)).await;
        api.release("/users/u1/role");
        ban
    });

    assert_eq!(role, DispatchOutcome::Completed);
    assert_eq!(ban, DispatchOutcome::Completed);
    assert_eq!(api.mutations().len(), 2);
}

#[tokio::test]
async fn test_key_is_reusable_after_completion() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));

    console.dispatch("u1", change_role(UserRole::Host)).await;
    let outcome = console.dispatch("u1", change_role(UserRole::Guest)).await;

    assert_eq!(outcome, DispatchOutcome::Completed);
    assert_eq!(api.mutations().len(), 2);
    assert_eq!(api.mutations()[1].body["role"], "guest");
}

// =============================================================================
// Critical action gate
// =============================================================================

#[tokio::test]
async fn test_whitespace_reason_never_reaches_network() {
    let api = seeded_api();
    let prompt = Arc::new(ScriptedPrompt::new().answer("   "));
    let console = open_console(api.clone(), prompt.clone());

    let outcome = console.dispatch("u1", AdminAction::User(UserAction::Ban)).await;

    assert_eq!(outcome, DispatchOutcome::Rejected(ValidationError::ReasonRequired));
    assert_eq!(prompt.prompt_count(), 1);
    assert!(api.calls().is_empty());
    assert_eq!(
        console.banners().current().action_error.as_deref(),
        Some("A reason is required for this action")
    );
}

#[tokio::test]
async fn test_every_critical_action_prompts() {
    let critical = vec![
        ("u1", AdminAction::User(UserAction::Block)),
        ("u1", AdminAction::User(UserAction::Ban)),
        ("b1", AdminAction::Booking(BookingAction::Cancel)),
        ("b1", AdminAction::Booking(BookingAction::Refund)),
        ("r1", AdminAction::Report(ReportAction::PauseExperience)),
        ("r1", AdminAction::Report(ReportAction::SuspendUser)),
    ];
    let api = seeded_api();
    let prompt = Arc::new(ScriptedPrompt::new());
    let console = open_console(api.clone(), prompt.clone());

    for (id, action) in critical {
        let outcome = console.dispatch(id, action).await;
        assert_eq!(outcome, DispatchOutcome::Rejected(ValidationError::ConfirmationDeclined));
    }

    assert_eq!(prompt.prompt_count(), 6);
    assert!(api.mutations().is_empty());
}

#[tokio::test]
async fn test_report_action_sends_verb_and_reason() {
    let api = seeded_api();
    let prompt = Arc::new(ScriptedPrompt::new().answer("repeat offender"));
    let console = open_console(api.clone(), prompt);

    let outcome = console
        .dispatch("r1", AdminAction::Report(ReportAction::SuspendUser))
        .await;

    assert_eq!(outcome, DispatchOutcome::Completed);
    let sent = &api.mutations()[0];
    assert_eq!(sent.path, "/reports/r1/actions");
    assert_eq!(sent.body["action"], "suspend_user");
    assert_eq!(sent.body["reason"], "repeat offender");
}

// =============================================================================
// Invalidation
// =============================================================================

#[tokio::test]
async fn test_refund_refreshes_bookings_and_open_detail() {
    let api = seeded_api();
    let prompt = Arc::new(ScriptedPrompt::new().answer("guest complaint"));
    let console = open_console(api.clone(), prompt);
    let detail_path = format!("/bookings/{}", BOOKING_ID);

    console.stores().booking_detail.select(BOOKING_ID).await;
    assert_eq!(api.get_count(&detail_path), 1);

    let outcome = console
        .dispatch(BOOKING_ID, AdminAction::Booking(BookingAction::Refund))
        .await;

    assert_eq!(outcome, DispatchOutcome::Completed);
    assert_eq!(api.get_count("/bookings"), 1);
    assert_eq!(api.get_count(&detail_path), 2);
    assert_eq!(api.get_count("/payments/health"), 1);
    assert_eq!(api.get_count("/dashboard"), 1);
    assert_eq!(api.get_count("/audit-logs/recent"), 1);
    assert_eq!(api.get_count("/reports"), 0);
    assert_eq!(api.get_count("/users"), 0);
}

#[tokio::test]
async fn test_refund_leaves_other_open_booking_alone() {
    let api = seeded_api();
    let prompt = Arc::new(ScriptedPrompt::new().answer("guest complaint"));
    let console = open_console(api.clone(), prompt);

    console.stores().booking_detail.select("b2").await;
    console
        .dispatch(BOOKING_ID, AdminAction::Booking(BookingAction::Refund))
        .await;

    assert_eq!(api.get_count("/bookings/b2"), 1);
    assert_eq!(api.get_count("/bookings"), 1);
}

#[tokio::test]
async fn test_user_action_refreshes_user_views() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));

    console.stores().user_detail.select("u1").await;
    console
        .dispatch("u1", AdminAction::User(UserAction::InvalidateSessions))
        .await;

    assert_eq!(api.get_count("/users"), 1);
    assert_eq!(api.get_count("/users/u1"), 2);
    assert_eq!(api.get_count("/dashboard"), 1);
    assert_eq!(api.get_count("/audit-logs/recent"), 1);
    assert_eq!(api.get_count("/bookings"), 0);
}

#[tokio::test]
async fn test_report_action_refreshes_affected_lists() {
    let api = seeded_api();
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));

    console
        .dispatch("r1", AdminAction::Report(ReportAction::MarkHandled))
        .await;

    assert_eq!(api.get_count("/reports"), 1);
    assert_eq!(api.get_count("/experiences"), 1);
    assert_eq!(api.get_count("/users"), 1);
    assert_eq!(api.get_count("/bookings"), 0);
}

#[tokio::test]
async fn test_failed_refetch_does_not_block_siblings() {
    let api = seeded_api();
    api.fail(
        "/dashboard",
        ApiError::Api {
            status: 500,
            message: "Dashboard unavailable".to_string(),
        },
    );
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));
    let stores = console.stores();

    let outcome = console.dispatch("u1", change_role(UserRole::Host)).await;

    assert_eq!(outcome, DispatchOutcome::Completed);
    assert_eq!(stores.dashboard.state().status, LoadStatus::Errored);
    assert_eq!(
        stores.dashboard.state().error.as_deref(),
        Some("Dashboard unavailable")
    );
    assert_eq!(stores.users.state().status, LoadStatus::Loaded);
    assert_eq!(stores.recent_audit.state().status, LoadStatus::Loaded);
    // Refetch failures stay in their own store
    assert!(console.banners().current().action_error.is_none());
}

// =============================================================================
// Banners
// =============================================================================

#[tokio::test]
async fn test_new_dispatch_clears_previous_error() {
    let api = seeded_api();
    api.fail(
        "/users/u1/sessions",
        ApiError::Api {
            status: 503,
            message: "Session store offline".to_string(),
        },
    );
    let console = open_console(api.clone(), Arc::new(ScriptedPrompt::new()));

    let failed = console
        .dispatch("u1", AdminAction::User(UserAction::InvalidateSessions))
        .await;
    assert_eq!(failed, DispatchOutcome::Failed("Session store offline".to_string()));
    assert_eq!(
        console.banners().current().action_error.as_deref(),
        Some("Session store offline")
    );

    console.dispatch("u1", change_role(UserRole::Host)).await;

    let banners = console.banners().current();
    assert!(banners.action_error.is_none());
    assert!(banners.action_info.is_some());

    console.dismiss_banners();
    assert!(console.banners().current().action_info.is_none());
}
