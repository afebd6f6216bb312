use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use modkit::api::problem::{Problem, ProblemResponse};
use tracing::{error, info, warn};

use crate::api::rest::caller::SharerId;
use crate::api::rest::dto::{
    BookingDto, CommentDto, CreateBookingReq, CreateCommentReq, CreateItemReq,
    CreateItemRequestReq, CreateUserReq, DecideQuery, ItemDetailsDto, ItemDto, ItemRequestDto,
    SearchQuery, StateQuery, UpdateItemReq, UpdateUserReq, UserDto,
};
use crate::api::rest::error::{bad_input, map_domain_error};
use crate::contract::model::{BookingState, NewBooking, NewComment, NewItem, NewItemRequest, NewUser};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

type Svc = Extension<Arc<Service>>;

fn problem(e: DomainError, uri: &Uri) -> ProblemResponse {
    if matches!(e, DomainError::Database { .. }) {
        error!("Request failed: {}", e);
    } else {
        warn!("Request rejected: {}", e);
    }
    map_domain_error(&e, uri.path())
}

fn body<T>(payload: Result<Json<T>, JsonRejection>, uri: &Uri) -> Result<T, ProblemResponse> {
    payload
        .map(|Json(v)| v)
        .map_err(|rej| bad_input(rej.body_text(), uri.path()))
}

fn path_id(id: Result<Path<i64>, PathRejection>, uri: &Uri) -> Result<i64, ProblemResponse> {
    id.map(|Path(v)| v)
        .map_err(|rej| bad_input(rej.body_text(), uri.path()))
}

fn query<T>(q: Result<Query<T>, QueryRejection>, uri: &Uri) -> Result<T, ProblemResponse> {
    q.map(|Query(v)| v)
        .map_err(|rej| bad_input(rej.body_text(), uri.path()))
}

/// Absent or blank means ALL.
fn parse_state(raw: Option<&str>) -> Result<BookingState, DomainError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(BookingState::All),
        Some(s) => BookingState::from_str(s).map_err(|e| DomainError::unknown_state(e.0)),
    }
}

// ---------- users ----------

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "Created user", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Conflict", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_user(
    uri: Uri,
    Extension(svc): Svc,
    payload: Result<Json<CreateUserReq>, JsonRejection>,
) -> Result<(StatusCode, Json<UserDto>), ProblemResponse> {
    let req = body(payload, &uri)?;
    info!("Creating user: {:?}", req);

    let new_user = NewUser::try_from(req).map_err(|e| problem(e, &uri))?;
    let user = svc.create_user(new_user).await.map_err(|e| problem(e, &uri))?;
    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses((status = 200, description = "Users by id", body = [UserDto]))
)]
pub async fn list_users(uri: Uri, Extension(svc): Svc) -> Result<Json<Vec<UserDto>>, ProblemResponse> {
    let users = svc.list_users().await.map_err(|e| problem(e, &uri))?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_user(
    uri: Uri,
    Extension(svc): Svc,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserDto>, ProblemResponse> {
    let id = path_id(id, &uri)?;
    info!("Getting user with id: {}", id);

    let user = svc.get_user(id).await.map_err(|e| problem(e, &uri))?;
    Ok(Json(UserDto::from(user)))
}

/// Update an existing user; blank fields are ignored
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserReq,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Conflict", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn update_user(
    uri: Uri,
    Extension(svc): Svc,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateUserReq>, JsonRejection>,
) -> Result<Json<UserDto>, ProblemResponse> {
    let id = path_id(id, &uri)?;
    let req = body(payload, &uri)?;
    info!("Updating user {} with: {:?}", id, req);

    let user = svc
        .update_user(id, req.into())
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok(Json(UserDto::from(user)))
}

/// Delete a user by ID
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "User still referenced", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn delete_user(
    uri: Uri,
    Extension(svc): Svc,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ProblemResponse> {
    let id = path_id(id, &uri)?;
    info!("Deleting user: {}", id);

    svc.delete_user(id).await.map_err(|e| problem(e, &uri))?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------- items ----------

/// List an item for sharing
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user id")),
    request_body = CreateItemReq,
    responses(
        (status = 201, description = "Created item", body = ItemDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Owner or request not found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_item(
    uri: Uri,
    Extension(svc): Svc,
    SharerId(user_id): SharerId,
    payload: Result<Json<CreateItemReq>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemDto>), ProblemResponse> {
    let req = body(payload, &uri)?;
    info!("User {} creating item: {:?}", user_id, req);

    let new_item = NewItem::try_from(req).map_err(|e| problem(e, &uri))?;
    let item = svc
        .create_item(user_id, new_item)
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok((StatusCode::CREATED, Json(ItemDto::from(item))))
}

/// Update an item; owner only
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user id"),
        ("id" = i64, Path, description = "Item id"),
    ),
    request_body = UpdateItemReq,
    responses(
        (status = 200, description = "Updated item", body = ItemDto),
        (status = 403, description = "Not the owner", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn update_item(
    uri: Uri,
    Extension(svc): Svc,
    SharerId(user_id): SharerId,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateItemReq>, JsonRejection>,
) -> Result<Json<ItemDto>, ProblemResponse> {
    let id = path_id(id, &uri)?;
    let req = body(payload, &uri)?;
    info!("User {} updating item {} with: {:?}", user_id, id, req);

    let item = svc
        .update_item(user_id, id, req.into())
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok(Json(ItemDto::from(item)))
}

/// Item with comments; booking windows for the owner
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user id"),
        ("id" = i64, Path, description = "Item id"),
    ),
    responses(
        (status = 200, description = "Item found", body = ItemDetailsDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_item(
    uri: Uri,
    Extension(svc): Svc,
    SharerId(user_id): SharerId,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ItemDetailsDto>, ProblemResponse> {
    let id = path_id(id, &uri)?;
    let details = svc
        .get_item(user_id, id)
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok(Json(ItemDetailsDto::from(details)))
}

/// Caller's own items
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user id")),
    responses(
        (status = 200, description = "Owner's items", body = [ItemDetailsDto]),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_owner_items(
    uri: Uri,
    Extension(svc): Svc,
    SharerId(user_id): SharerId,
) -> Result<Json<Vec<ItemDetailsDto>>, ProblemResponse> {
    let items = svc
        .list_owner_items(user_id)
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok(Json(items.into_iter().map(ItemDetailsDto::from).collect()))
}

/// Search available items by text
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(SearchQuery),
    responses((status = 200, description = "Matching available items", body = [ItemDto]))
)]
pub async fn search_items(
    uri: Uri,
    Extension(svc): Svc,
    q: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<ItemDto>>, ProblemResponse> {
    let q = query(q, &uri)?;
    let items = svc
        .search_items(q.text.as_deref().unwrap_or_default())
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok(Json(items.into_iter().map(ItemDto::from).collect()))
}

/// Review an item after a finished booking
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user id"),
        ("id" = i64, Path, description = "Item id"),
    ),
    request_body = CreateCommentReq,
    responses(
        (status = 200, description = "Comment added", body = CommentDto),
        (status = 400, description = "No finished booking or blank text", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn add_comment(
    uri: Uri,
    Extension(svc): Svc,
    SharerId(user_id): SharerId,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CreateCommentReq>, JsonRejection>,
) -> Result<Json<CommentDto>, ProblemResponse> {
    let id = path_id(id, &uri)?;
    let req = body(payload, &uri)?;
    info!("User {} commenting item {}", user_id, id);

    let new_comment = NewComment::try_from(req).map_err(|e| problem(e, &uri))?;
    let comment = svc
        .add_comment(user_id, id, new_comment)
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok(Json(CommentDto::from(comment)))
}

// ---------- bookings ----------

/// Request a booking
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user id")),
    request_body = CreateBookingReq,
    responses(
        (status = 201, description = "Booking created in WAITING", body = BookingDto),
        (status = 400, description = "Invalid interval or item unavailable", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Owner cannot book own item", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Item or user not found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_booking(
    uri: Uri,
    Extension(svc): Svc,
    SharerId(user_id): SharerId,
    payload: Result<Json<CreateBookingReq>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingDto>), ProblemResponse> {
    let req = body(payload, &uri)?;
    info!("User {} booking: {:?}", user_id, req);

    let new_booking = NewBooking::try_from(req).map_err(|e| problem(e, &uri))?;
    let booking = svc
        .create_booking(user_id, new_booking)
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok((StatusCode::CREATED, Json(BookingDto::from(booking))))
}

/// Approve or reject a booking; item owner only
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user id"),
        ("id" = i64, Path, description = "Booking id"),
        DecideQuery,
    ),
    responses(
        (status = 200, description = "Decided booking", body = BookingDto),
        (status = 400, description = "Missing approved flag", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Not the item owner", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Already decided", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn decide_booking(
    uri: Uri,
    Extension(svc): Svc,
    SharerId(user_id): SharerId,
    id: Result<Path<i64>, PathRejection>,
    q: Result<Query<DecideQuery>, QueryRejection>,
) -> Result<Json<BookingDto>, ProblemResponse> {
    let id = path_id(id, &uri)?;
    let approved = query(q, &uri)?
        .approved
        .ok_or_else(|| problem(DomainError::validation("approved", "must be provided"), &uri))?;
    info!("User {} deciding booking {}: approved={}", user_id, id, approved);

    let booking = svc
        .decide_booking(user_id, id, approved)
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok(Json(BookingDto::from(booking)))
}

/// Get a booking; booker or item owner only
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user id"),
        ("id" = i64, Path, description = "Booking id"),
    ),
    responses(
        (status = 200, description = "Booking found", body = BookingDto),
        (status = 403, description = "Not a party to the booking", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_booking(
    uri: Uri,
    Extension(svc): Svc,
    SharerId(user_id): SharerId,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<BookingDto>, ProblemResponse> {
    let id = path_id(id, &uri)?;
    let booking = svc
        .get_booking(user_id, id)
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok(Json(BookingDto::from(booking)))
}

/// Caller's bookings as booker
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user id"), StateQuery),
    responses(
        (status = 200, description = "Bookings, newest start first", body = [BookingDto]),
        (status = 400, description = "Unknown state", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_booker_bookings(
    uri: Uri,
    Extension(svc): Svc,
    SharerId(user_id): SharerId,
    q: Result<Query<StateQuery>, QueryRejection>,
) -> Result<Json<Vec<BookingDto>>, ProblemResponse> {
    let q = query(q, &uri)?;
    let state = parse_state(q.state.as_deref()).map_err(|e| problem(e, &uri))?;
    let bookings = svc
        .list_booker_bookings(user_id, state)
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok(Json(bookings.into_iter().map(BookingDto::from).collect()))
}

/// Bookings on the caller's items
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user id"), StateQuery),
    responses(
        (status = 200, description = "Bookings, newest start first", body = [BookingDto]),
        (status = 400, description = "Unknown state", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_owner_bookings(
    uri: Uri,
    Extension(svc): Svc,
    SharerId(user_id): SharerId,
    q: Result<Query<StateQuery>, QueryRejection>,
) -> Result<Json<Vec<BookingDto>>, ProblemResponse> {
    let q = query(q, &uri)?;
    let state = parse_state(q.state.as_deref()).map_err(|e| problem(e, &uri))?;
    let bookings = svc
        .list_owner_bookings(user_id, state)
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok(Json(bookings.into_iter().map(BookingDto::from).collect()))
}

// ---------- requests ----------

/// Post an item request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user id")),
    request_body = CreateItemRequestReq,
    responses(
        (status = 201, description = "Request created", body = ItemRequestDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_request(
    uri: Uri,
    Extension(svc): Svc,
    SharerId(user_id): SharerId,
    payload: Result<Json<CreateItemRequestReq>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemRequestDto>), ProblemResponse> {
    let req = body(payload, &uri)?;
    info!("User {} posting request", user_id);

    let new_request = NewItemRequest::try_from(req).map_err(|e| problem(e, &uri))?;
    let request = svc
        .create_request(user_id, new_request)
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok((StatusCode::CREATED, Json(ItemRequestDto::from(request))))
}

/// Caller's own requests, newest first
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    params(("X-Sharer-User-Id" = i64, Header, description = "Acting user id")),
    responses(
        (status = 200, description = "Own requests", body = [ItemRequestDto]),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_own_requests(
    uri: Uri,
    Extension(svc): Svc,
    SharerId(user_id): SharerId,
) -> Result<Json<Vec<ItemRequestDto>>, ProblemResponse> {
    let requests = svc
        .list_own_requests(user_id)
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok(Json(requests.into_iter().map(ItemRequestDto::from).collect()))
}

/// Every request on the board, newest first
#[utoipa::path(
    get,
    path = "/requests/all",
    tag = "requests",
    responses((status = 200, description = "All requests", body = [ItemRequestDto]))
)]
pub async fn list_all_requests(
    uri: Uri,
    Extension(svc): Svc,
) -> Result<Json<Vec<ItemRequestDto>>, ProblemResponse> {
    let requests = svc
        .list_all_requests()
        .await
        .map_err(|e| problem(e, &uri))?;
    Ok(Json(requests.into_iter().map(ItemRequestDto::from).collect()))
}

/// A single request with the items listed in answer
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = i64, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request found", body = ItemRequestDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_request(
    uri: Uri,
    Extension(svc): Svc,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ItemRequestDto>, ProblemResponse> {
    let id = path_id(id, &uri)?;
    let request = svc.get_request(id).await.map_err(|e| problem(e, &uri))?;
    Ok(Json(ItemRequestDto::from(request)))
}
