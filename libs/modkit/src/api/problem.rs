use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// RFC 9457 Problem Details for HTTP APIs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    title = "Problem",
    description = "RFC 9457 Problem Details for HTTP APIs"
)]
pub struct Problem {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code for this occurrence of the problem.
    pub status: u16,
    /// A human-readable explanation specific to this occurrence of the problem.
    pub detail: String,
    /// The request path that produced the problem.
    pub instance: String,
    /// Machine-readable error code, stable across releases.
    pub code: String,
    /// Id of the tracing span that was active when the problem was produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Field-level validation errors for 4xx problems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationError>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "ValidationError")]
pub struct ValidationError {
    pub detail: String,
    /// JSON Pointer to the invalid location (e.g., "/start").
    pub pointer: String,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_string(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            trace_id: None,
            errors: None,
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<ValidationError>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Attach the id of the current tracing span, if any.
    pub fn with_current_trace(self) -> Self {
        match tracing::Span::current().id() {
            Some(id) => self.with_trace_id(id.into_u64().to_string()),
            None => self,
        }
    }
}

/// Axum response wrapper that renders `Problem` with correct status & content type.
#[derive(Debug, Clone)]
pub struct ProblemResponse(pub Problem);

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self(p)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut resp = axum::Json(self.0).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn problem_into_response_sets_status_and_content_type() {
        let p = Problem::new(StatusCode::FORBIDDEN, "Forbidden", "not the owner");
        let resp = ProblemResponse(p).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let ct = resp
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(ct, APPLICATION_PROBLEM_JSON);
    }

    #[test]
    fn problem_builder_pattern() {
        let p = Problem::new(StatusCode::BAD_REQUEST, "Validation error", "bad interval")
            .with_code("SHAREIT_VALIDATION")
            .with_instance("/bookings")
            .with_trace_id("42")
            .with_errors(vec![ValidationError {
                detail: "start must be before end".to_string(),
                pointer: "/start".to_string(),
            }]);

        assert_eq!(p.status, 400);
        assert_eq!(p.code, "SHAREIT_VALIDATION");
        assert_eq!(p.instance, "/bookings");
        assert_eq!(p.trace_id.as_deref(), Some("42"));
        assert_eq!(p.errors.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let p = Problem::new(StatusCode::NOT_FOUND, "Not Found", "missing");
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["type"], "about:blank");
        assert!(v.get("trace_id").is_none());
        assert!(v.get("errors").is_none());
    }
}
