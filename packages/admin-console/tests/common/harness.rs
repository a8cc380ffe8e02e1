//! Console harness over the mock admin API.

use std::sync::Arc;

use admin_console::testing::{page_of, MockAdminApi, ScriptedPrompt};
use admin_console::{AccessDecision, ConsoleConfig, ConsoleController};
use serde_json::json;

use super::fixtures::*;

/// A mock API with a healthy response on every read endpoint.
pub fn seeded_api() -> Arc<MockAdminApi> {
    Arc::new(
        MockAdminApi::new()
            .with_response("/users", page_of(vec![user("u1"), user("u2")], 1, 3))
            .with_response("/experiences", page_of(vec![experience("e1")], 1, 2))
            .with_response("/bookings", page_of(vec![booking(BOOKING_ID)], 1, 4))
            .with_response("/reports", page_of(vec![report("r1")], 1, 2))
            .with_response("/audit-logs", page_of(vec![audit_event("a1")], 1, 2))
            .with_response("/audit-logs/recent", page_of(vec![audit_event("a1")], 1, 1))
            .with_response(
                "/payments/health",
                json!({ "status": "ok", "failedLast24h": 2, "pendingRefunds": 1 }),
            )
            .with_response("/system/health", json!({ "status": "ok", "uptimeSeconds": 3600 }))
            .with_response("/dashboard", json!({ "totalUsers": 120, "openReports": 4 }))
            .with_response("/users/u1", json!({ "user": user("u1") }))
            .with_response("/users/u2", json!({ "user": user("u2") }))
            .with_response(
                &format!("/bookings/{}", BOOKING_ID),
                json!({ "booking": booking(BOOKING_ID) }),
            )
            .with_response("/bookings/b2", json!({ "booking": booking("b2") })),
    )
}

/// Route console logs to the test writer. Run with `RUST_LOG=admin_console=debug`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn open_console(api: Arc<MockAdminApi>, prompt: Arc<ScriptedPrompt>) -> Box<ConsoleController> {
    init_tracing();
    match ConsoleController::open(Some(admin_session()), api, prompt, &ConsoleConfig::default()) {
        AccessDecision::Granted(console) => console,
        _ => panic!("admin session should open the console"),
    }
}
