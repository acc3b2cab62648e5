//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?limit=` for bounded list endpoints.
///
/// Clamping happens in the query service, so any integer is accepted here.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
