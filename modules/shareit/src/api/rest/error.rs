use axum::http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse, ValidationError};

use crate::domain::error::DomainError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.shareit.dev/{code}"))
        .with_code(code)
        .with_instance(instance)
        .with_current_trace();

    ProblemResponse(problem)
}

/// Malformed header, path, query or body.
pub fn bad_input(detail: impl Into<String>, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "SHAREIT_BAD_REQUEST",
        "Bad request",
        detail,
        instance,
    )
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::UserNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "SHAREIT_USER_NOT_FOUND",
            "User not found",
            e.to_string(),
            instance,
        ),
        DomainError::ItemNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "SHAREIT_ITEM_NOT_FOUND",
            "Item not found",
            e.to_string(),
            instance,
        ),
        DomainError::BookingNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "SHAREIT_BOOKING_NOT_FOUND",
            "Booking not found",
            e.to_string(),
            instance,
        ),
        DomainError::RequestNotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "SHAREIT_REQUEST_NOT_FOUND",
            "Request not found",
            e.to_string(),
            instance,
        ),
        DomainError::NotItemOwner { .. }
        | DomainError::NotBookingParty { .. }
        | DomainError::OwnItemBooking { .. } => from_parts(
            StatusCode::FORBIDDEN,
            "SHAREIT_ACCESS_DENIED",
            "Access denied",
            e.to_string(),
            instance,
        ),
        DomainError::ItemUnavailable { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "SHAREIT_ITEM_UNAVAILABLE",
            "Item unavailable",
            e.to_string(),
            instance,
        ),
        DomainError::BookingAlreadyDecided { .. } => from_parts(
            StatusCode::CONFLICT,
            "SHAREIT_BOOKING_ALREADY_DECIDED",
            "Booking already decided",
            e.to_string(),
            instance,
        ),
        DomainError::CommentNotAllowed { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "SHAREIT_COMMENT_NOT_ALLOWED",
            "Comment not allowed",
            e.to_string(),
            instance,
        ),
        DomainError::EmailAlreadyExists { email } => from_parts(
            StatusCode::CONFLICT,
            "SHAREIT_EMAIL_CONFLICT",
            "Email already exists",
            format!("Email '{email}' is already in use"),
            instance,
        ),
        DomainError::UserInUse { .. } => from_parts(
            StatusCode::CONFLICT,
            "SHAREIT_USER_IN_USE",
            "User in use",
            e.to_string(),
            instance,
        ),
        DomainError::InvalidEmail { .. } => {
            let ProblemResponse(p) = from_parts(
                StatusCode::BAD_REQUEST,
                "SHAREIT_INVALID_EMAIL",
                "Invalid email",
                e.to_string(),
                instance,
            );
            ProblemResponse(p.with_errors(vec![ValidationError {
                detail: e.to_string(),
                pointer: "/email".to_string(),
            }]))
        }
        DomainError::UnknownState { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "SHAREIT_UNKNOWN_STATE",
            "Unknown state",
            e.to_string(),
            instance,
        ),
        DomainError::Validation { field, message } => {
            let ProblemResponse(p) = from_parts(
                StatusCode::BAD_REQUEST,
                "SHAREIT_VALIDATION",
                "Validation error",
                e.to_string(),
                instance,
            );
            ProblemResponse(p.with_errors(vec![ValidationError {
                detail: message.clone(),
                pointer: format!("/{field}"),
            }]))
        }
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "SHAREIT_INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::BookingStatus;

    fn status_and_code(e: DomainError) -> (u16, String) {
        let ProblemResponse(p) = map_domain_error(&e, "/x");
        (p.status, p.code)
    }

    #[test]
    fn invalid_access_statuses_follow_the_rule_table() {
        assert_eq!(status_and_code(DomainError::not_item_owner(1, 2)).0, 403);
        assert_eq!(status_and_code(DomainError::not_booking_party(1, 2)).0, 403);
        assert_eq!(status_and_code(DomainError::own_item_booking(2)).0, 403);
        assert_eq!(status_and_code(DomainError::item_unavailable(2)).0, 400);
        assert_eq!(
            status_and_code(DomainError::already_decided(5, BookingStatus::Approved)),
            (409, "SHAREIT_BOOKING_ALREADY_DECIDED".to_string())
        );
        assert_eq!(status_and_code(DomainError::comment_not_allowed(1, 2)).0, 400);
    }

    #[test]
    fn database_detail_is_not_leaked() {
        let ProblemResponse(p) =
            map_domain_error(&DomainError::database("disk I/O error at /var/db"), "/bookings");
        assert_eq!(p.status, 500);
        assert!(!p.detail.contains("disk"));
        assert_eq!(p.instance, "/bookings");
    }

    #[test]
    fn validation_points_at_the_field() {
        let ProblemResponse(p) =
            map_domain_error(&DomainError::validation("start", "must be before end"), "/bookings");
        assert_eq!(p.code, "SHAREIT_VALIDATION");
        let errors = p.errors.unwrap();
        assert_eq!(errors[0].pointer, "/start");
    }
}
