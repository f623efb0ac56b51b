//! Database access layer for synap-directory
//!
//! Query functions take the pool explicitly and return `synap_common::Result`.
//! Validation that depends on database state (unknown category, missing tag)
//! happens here; request-shape validation happens in the handlers.

pub mod bookmarks;
pub mod catalog;
pub mod posts;
pub mod sidebar;
pub mod tags;
pub mod users;

use synap_common::Error;

/// Convert a UNIQUE violation into a `Conflict` carrying `message`
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> Error {
    let err = Error::from(err);
    if err.is_unique_violation() {
        Error::Conflict(message.to_string())
    } else {
        err
    }
}

/// Convert a FOREIGN KEY violation into a `Conflict` carrying `message`
pub(crate) fn conflict_on_reference(err: sqlx::Error, message: &str) -> Error {
    let err = Error::from(err);
    if err.is_foreign_key_violation() {
        Error::Conflict(message.to_string())
    } else {
        err
    }
}

/// Trimmed value, `None` when empty
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
