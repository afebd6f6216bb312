//! Domain service with the business rules of the sharing platform.
//! Depends only on the repository and clock ports, not on infra types.

use std::sync::Arc;

use chrono::Duration;

use crate::contract::model::{Item, User};
use crate::domain::error::DomainError;
use crate::domain::ports::Clock;
use crate::domain::repo::{
    BookingsRepository, CommentsRepository, ItemsRepository, Repositories, RequestsRepository,
    UsersRepository,
};

mod bookings;
mod comments;
mod items;
mod requests;
mod users;

#[derive(Clone)]
pub struct Service {
    users: Arc<dyn UsersRepository>,
    items: Arc<dyn ItemsRepository>,
    bookings: Arc<dyn BookingsRepository>,
    comments: Arc<dyn CommentsRepository>,
    requests: Arc<dyn RequestsRepository>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// An approved booking only counts as "last" once it ended this long ago.
    pub last_booking_grace: Duration,
    pub max_name_length: usize,
    pub max_text_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            last_booking_grace: Duration::zero(),
            max_name_length: 255,
            max_text_length: 2000,
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(repos: Repositories, clock: Arc<dyn Clock>, config: ServiceConfig) -> Self {
        Self {
            users: repos.users,
            items: repos.items,
            bookings: repos.bookings,
            comments: repos.comments,
            requests: repos.requests,
            clock,
            config,
        }
    }

    async fn require_user(&self, id: i64) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(db_error)?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    async fn require_item(&self, id: i64) -> Result<Item, DomainError> {
        self.items
            .find_by_id(id)
            .await
            .map_err(db_error)?
            .ok_or_else(|| DomainError::item_not_found(id))
    }

    // --- validation helpers ---

    fn validate_required(&self, field: &str, value: &str, max: usize) -> Result<(), DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::validation(field, "must not be blank"));
        }
        let len = value.chars().count();
        if len > max {
            return Err(DomainError::validation(
                field,
                format!("too long: {len} characters (max: {max})"),
            ));
        }
        Ok(())
    }

    fn validate_name(&self, field: &str, value: &str) -> Result<(), DomainError> {
        self.validate_required(field, value, self.config.max_name_length)
    }

    fn validate_text(&self, field: &str, value: &str) -> Result<(), DomainError> {
        self.validate_required(field, value, self.config.max_text_length)
    }
}

fn db_error(e: anyhow::Error) -> DomainError {
    DomainError::database(format!("{e:#}"))
}

/// Patch values that are absent or blank leave the field unchanged.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
