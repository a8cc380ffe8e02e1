//! Console access gate.
//!
//! Sign-in and tokens belong to the auth collaborator. This module only
//! decides what to do with the session it hands over.

use crate::models::UserRole;

/// Authenticated session as reported by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

impl AdminSession {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Where an attempt to open the console leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessCheck {
    Granted,
    RedirectToSignIn,
    RedirectToLanding,
}

pub fn check_access(session: Option<&AdminSession>) -> AccessCheck {
    match session {
        None => AccessCheck::RedirectToSignIn,
        Some(session) if !session.is_admin() => AccessCheck::RedirectToLanding,
        Some(_) => AccessCheck::Granted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: UserRole) -> AdminSession {
        AdminSession {
            user_id: "u1".to_string(),
            email: "ops@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_access_check() {
        assert_eq!(check_access(None), AccessCheck::RedirectToSignIn);
        assert_eq!(
            check_access(Some(&session(UserRole::Host))),
            AccessCheck::RedirectToLanding
        );
        assert_eq!(
            check_access(Some(&session(UserRole::Admin))),
            AccessCheck::Granted
        );
    }
}
