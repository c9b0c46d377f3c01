//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Toggle-style writes
//! add a human-readable `message` next to the payload.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": T, "message": "..." }` envelope for state-changing actions.
#[derive(Debug, Serialize)]
pub struct MessageResponse<T: Serialize> {
    pub data: T,
    pub message: &'static str,
}
