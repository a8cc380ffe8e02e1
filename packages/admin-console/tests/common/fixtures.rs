//! Payload fixtures shaped like admin API responses.

use admin_console::models::UserRole;
use admin_console::AdminSession;
use serde_json::{json, Value};

pub const BOOKING_ID: &str = "507f1f77bcf86cd799439011";

pub fn admin_session() -> AdminSession {
    AdminSession {
        user_id: "admin-1".to_string(),
        email: "ops@example.com".to_string(),
        role: UserRole::Admin,
    }
}

pub fn user(id: &str) -> Value {
    json!({ "id": id, "email": format!("{}@example.com", id), "role": "guest" })
}

pub fn experience(id: &str) -> Value {
    json!({ "id": id, "title": "Sunset kayaking", "status": "active", "hostId": "h1" })
}

pub fn booking(id: &str) -> Value {
    json!({ "id": id, "status": "confirmed", "guestId": "u1", "experienceId": "e1" })
}

pub fn report(id: &str) -> Value {
    json!({
        "id": id,
        "targetType": "user",
        "targetId": "u1",
        "reason": "spam host",
        "status": "open"
    })
}

pub fn audit_event(id: &str) -> Value {
    json!({
        "id": id,
        "actorId": "admin-1",
        "actorEmail": "ops@example.com",
        "actionType": "user.ban",
        "targetType": "user",
        "targetId": "u1",
        "reason": "fraud",
        "createdAt": "2024-05-01T10:00:00Z"
    })
}
