use thiserror::Error;

use crate::contract::model::BookingStatus;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: i64 },

    #[error("Item not found: {id}")]
    ItemNotFound { id: i64 },

    #[error("Booking not found: {id}")]
    BookingNotFound { id: i64 },

    #[error("Request not found: {id}")]
    RequestNotFound { id: i64 },

    #[error("User {user_id} is not the owner of item {item_id}")]
    NotItemOwner { user_id: i64, item_id: i64 },

    #[error("User {user_id} is neither the booker nor the owner for booking {booking_id}")]
    NotBookingParty { user_id: i64, booking_id: i64 },

    #[error("Owner cannot book own item {item_id}")]
    OwnItemBooking { item_id: i64 },

    #[error("Item {item_id} is not available for booking")]
    ItemUnavailable { item_id: i64 },

    #[error("Booking {booking_id} is already {status}")]
    BookingAlreadyDecided {
        booking_id: i64,
        status: BookingStatus,
    },

    #[error("User {user_id} has no completed booking of item {item_id}")]
    CommentNotAllowed { user_id: i64, item_id: i64 },

    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("User {id} is still referenced by items, bookings, comments or requests")]
    UserInUse { id: i64 },

    #[error("Invalid email format: '{email}'")]
    InvalidEmail { email: String },

    #[error("Unknown state: {state}")]
    UnknownState { state: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },
}

impl DomainError {
    pub fn user_not_found(id: i64) -> Self {
        Self::UserNotFound { id }
    }

    pub fn item_not_found(id: i64) -> Self {
        Self::ItemNotFound { id }
    }

    pub fn booking_not_found(id: i64) -> Self {
        Self::BookingNotFound { id }
    }

    pub fn request_not_found(id: i64) -> Self {
        Self::RequestNotFound { id }
    }

    pub fn not_item_owner(user_id: i64, item_id: i64) -> Self {
        Self::NotItemOwner { user_id, item_id }
    }

    pub fn not_booking_party(user_id: i64, booking_id: i64) -> Self {
        Self::NotBookingParty {
            user_id,
            booking_id,
        }
    }

    pub fn own_item_booking(item_id: i64) -> Self {
        Self::OwnItemBooking { item_id }
    }

    pub fn item_unavailable(item_id: i64) -> Self {
        Self::ItemUnavailable { item_id }
    }

    pub fn already_decided(booking_id: i64, status: BookingStatus) -> Self {
        Self::BookingAlreadyDecided { booking_id, status }
    }

    pub fn comment_not_allowed(user_id: i64, item_id: i64) -> Self {
        Self::CommentNotAllowed { user_id, item_id }
    }

    pub fn email_already_exists(email: String) -> Self {
        Self::EmailAlreadyExists { email }
    }

    pub fn user_in_use(id: i64) -> Self {
        Self::UserInUse { id }
    }

    pub fn invalid_email(email: String) -> Self {
        Self::InvalidEmail { email }
    }

    pub fn unknown_state(state: impl Into<String>) -> Self {
        Self::UnknownState {
            state: state.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Authorization and state-rule violations: the caller may not do this.
    pub fn is_invalid_access(&self) -> bool {
        matches!(
            self,
            Self::NotItemOwner { .. }
                | Self::NotBookingParty { .. }
                | Self::OwnItemBooking { .. }
                | Self::ItemUnavailable { .. }
                | Self::BookingAlreadyDecided { .. }
                | Self::CommentNotAllowed { .. }
        )
    }
}
