use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareItError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Access denied: {message}")]
    InvalidAccess { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl ShareItError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn invalid_access(message: impl Into<String>) -> Self {
        Self::InvalidAccess {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for ShareItError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        if domain_error.is_invalid_access() {
            return Self::invalid_access(domain_error.to_string());
        }
        match domain_error {
            UserNotFound { id } => Self::not_found("User", id),
            ItemNotFound { id } => Self::not_found("Item", id),
            BookingNotFound { id } => Self::not_found("Booking", id),
            RequestNotFound { id } => Self::not_found("Request", id),
            EmailAlreadyExists { email } => {
                Self::conflict(format!("Email '{email}' is already in use"))
            }
            e @ UserInUse { .. } => Self::conflict(e.to_string()),
            InvalidEmail { email } => Self::validation(format!("Invalid email: {email}")),
            UnknownState { state } => Self::validation(format!("Unknown state: {state}")),
            Validation { field, message } => Self::validation(format!("{field}: {message}")),
            Database { .. } => Self::internal(),
            other => Self::invalid_access(other.to_string()),
        }
    }
}
