//! Request/response payloads for the HTTP command gateway.

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod challenge;
pub mod health;
pub mod steps;

/// Render a timestamp as RFC 3339 for API responses.
pub(crate) fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
