use std::time::Duration;

use axum::{middleware::from_fn, routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

use crate::http::{request_id, web};

/// Knobs for the outer middleware stack.
#[derive(Debug, Clone)]
pub struct IngressConfig {
    pub request_timeout: Duration,
    pub cors_enabled: bool,
    pub body_limit_bytes: usize,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_enabled: false,
            body_limit_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Wrap module routes with the ingress stack and the `/health` probe.
///
/// Layers, outermost first:
/// SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions -> Timeout -> CORS -> BodyLimit
pub fn apply_ingress_layers(router: Router, cfg: &IngressConfig) -> Router {
    let x_request_id = request_id::header();

    let mut router = router
        .route("/health", get(web::health_check))
        .layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes));

    if cfg.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(TimeoutLayer::new(cfg.request_timeout))
        .layer(from_fn(request_id::push_req_id_to_extensions))
        .layer(request_id::create_trace_layer())
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_route_is_added() {
        let router = apply_ingress_layers(Router::new(), &IngressConfig::default());
        let resp = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn request_id_is_generated_and_echoed() {
        let router = apply_ingress_layers(Router::new(), &IngressConfig::default());
        let resp = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let rid = resp
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(!rid.is_empty());
    }

    #[tokio::test]
    async fn client_request_id_is_propagated() {
        let router = apply_ingress_layers(Router::new(), &IngressConfig::default());
        let resp = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "client-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.headers().get("x-request-id").unwrap(), "client-123");
    }
}
