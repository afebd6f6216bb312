//! # ModKit - shared HTTP toolkit
//!
//! Small set of building blocks every REST module and the server binary share:
//!
//! - **Problem details**: RFC 9457 `Problem` + `ProblemResponse` for error bodies
//! - **Ingress**: request-id, tracing, timeout, CORS and body-limit layers
//! - **Runtime**: OS signal handling for graceful shutdown

pub use anyhow::Result;

pub mod api;
pub mod http;
pub mod runtime;

pub use api::problem::{Problem, ProblemResponse, ValidationError, APPLICATION_PROBLEM_JSON};
pub use http::ingress::{apply_ingress_layers, IngressConfig};
