//! Shared response envelope types for API handlers.
//!
//! Admin resources answer with a `{ "data": ... }` envelope. The public
//! signup flow answers with `{ "success", "message", ... }` bodies
//! built in its handler module.

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

/// `{ "count": n }` body for counter endpoints.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}
