//! Global search routing.
//!
//! Rules, first match wins:
//! 1. contains `@`                   -> users, query as-is
//! 2. starts with `report:`/`report ` -> reports, prefix stripped
//! 3. 24 hex characters              -> bookings, query as-is
//! 4. anything else                  -> experiences, query as-is

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;
use crate::types::ResourceKind;

lazy_static! {
    static ref REPORT_PREFIX: Regex = Regex::new(r"(?i)^report[:\s]\s*").unwrap();
    static ref OBJECT_ID: Regex = Regex::new(r"(?i)^[0-9a-f]{24}$").unwrap();
}

/// Where a search lands and what it seeds the section's text filter with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoute {
    pub kind: ResourceKind,
    pub filter: String,
}

/// Classify free text. Blank input is rejected.
pub fn classify(input: &str) -> Result<SearchRoute, ValidationError> {
    let query = input.trim();
    if query.is_empty() {
        return Err(ValidationError::EmptySearch);
    }

    let route = if query.contains('@') {
        SearchRoute {
            kind: ResourceKind::User,
            filter: query.to_string(),
        }
    } else if REPORT_PREFIX.is_match(query) {
        SearchRoute {
            kind: ResourceKind::Report,
            filter: REPORT_PREFIX.replace(query, "").trim().to_string(),
        }
    } else if OBJECT_ID.is_match(query) {
        SearchRoute {
            kind: ResourceKind::Booking,
            filter: query.to_string(),
        }
    } else {
        SearchRoute {
            kind: ResourceKind::Experience,
            filter: query.to_string(),
        }
    };

    Ok(route)
}
