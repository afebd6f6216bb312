use axum::{extract::FromRequestParts, http::request::Parts};
use modkit::api::problem::ProblemResponse;

use crate::api::rest::error::bad_input;

/// Header carrying the acting user's id. Trusted as-is; there is no authentication.
pub const SHARER_USER_ID: &str = "X-Sharer-User-Id";

/// Acting user, taken from `X-Sharer-User-Id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharerId(pub i64);

impl<S> FromRequestParts<S> for SharerId
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let instance = parts.uri.path().to_owned();
        let raw = parts
            .headers
            .get(SHARER_USER_ID)
            .ok_or_else(|| bad_input(format!("Missing header {SHARER_USER_ID}"), &instance))?;
        raw.to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(SharerId)
            .ok_or_else(|| bad_input(format!("Header {SHARER_USER_ID} must be a number"), &instance))
    }
}
