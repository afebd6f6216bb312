use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Mount every shareit endpoint on `router`.
///
/// Static segments (`/items/search`, `/bookings/owner`, `/requests/all`) win over
/// the `{id}` captures next to them.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        // users
        .route("/users", post(handlers::create_user).get(handlers::list_users))
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        // items
        .route(
            "/items",
            post(handlers::create_item).get(handlers::list_owner_items),
        )
        .route("/items/search", get(handlers::search_items))
        .route(
            "/items/{id}",
            get(handlers::get_item).patch(handlers::update_item),
        )
        .route("/items/{id}/comment", post(handlers::add_comment))
        // bookings
        .route(
            "/bookings",
            post(handlers::create_booking).get(handlers::list_booker_bookings),
        )
        .route("/bookings/owner", get(handlers::list_owner_bookings))
        .route(
            "/bookings/{id}",
            get(handlers::get_booking).patch(handlers::decide_booking),
        )
        // requests
        .route(
            "/requests",
            post(handlers::create_request).get(handlers::list_own_requests),
        )
        .route("/requests/all", get(handlers::list_all_requests))
        .route("/requests/{id}", get(handlers::get_request))
        .layer(Extension(service))
}
