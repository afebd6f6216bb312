use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{
    Booking, BookingStatus, Comment, Item, ItemRequest, NewItem, NewUser, User,
};

/// Persistence ports the domain needs. Object-safe and async-friendly via `async_trait`.
///
/// The service validates and computes; repositories persist and load.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    /// Check uniqueness by email.
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;
    async fn insert(&self, u: NewUser) -> anyhow::Result<User>;
    /// Update an existing user (by primary key in `u.id`).
    async fn update(&self, u: User) -> anyhow::Result<()>;
    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
    /// All users by id ascending.
    async fn list(&self) -> anyhow::Result<Vec<User>>;
    /// True while any item, booking, comment or request points at the user.
    async fn is_referenced(&self, id: i64) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait ItemsRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Item>>;
    async fn insert(&self, owner_id: i64, item: NewItem) -> anyhow::Result<Item>;
    async fn update(&self, item: Item) -> anyhow::Result<()>;
    /// Owner's items by id ascending.
    async fn list_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Item>>;
    /// Available items whose name or description contains `text`, case-insensitively.
    async fn search_available(&self, text: &str) -> anyhow::Result<Vec<Item>>;
    /// Items listed in answer to any of the given requests.
    async fn list_by_requests(&self, request_ids: &[i64]) -> anyhow::Result<Vec<Item>>;
}

/// Booking row to insert; the status is always WAITING.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub item_id: i64,
    pub booker_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[async_trait]
pub trait BookingsRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Booking>>;
    /// Insert atomically with a fresh read of the item's availability.
    /// Returns `None` when the item is unavailable at insert time.
    async fn insert_if_item_available(&self, draft: BookingDraft)
        -> anyhow::Result<Option<Booking>>;
    /// Conditional update `WAITING -> status`. Returns false if the booking was no longer WAITING.
    async fn decide(&self, id: i64, status: BookingStatus) -> anyhow::Result<bool>;
    async fn list_by_booker(&self, booker_id: i64) -> anyhow::Result<Vec<Booking>>;
    /// Bookings on any item owned by `owner_id`.
    async fn list_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Booking>>;
    /// Bookings of the given items, any status.
    async fn list_by_items(&self, item_ids: &[i64]) -> anyhow::Result<Vec<Booking>>;
}

/// Comment row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub item_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}

#[async_trait]
pub trait CommentsRepository: Send + Sync {
    async fn insert(&self, draft: CommentDraft) -> anyhow::Result<Comment>;
    /// Comments of the given items, oldest first, with author names resolved.
    async fn list_by_items(&self, item_ids: &[i64]) -> anyhow::Result<Vec<Comment>>;
}

/// Request row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDraft {
    pub requestor_id: i64,
    pub description: String,
    pub created: DateTime<Utc>,
}

/// Request board persistence. Returned requests carry no items; the service attaches them.
#[async_trait]
pub trait RequestsRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<ItemRequest>>;
    async fn insert(&self, draft: RequestDraft) -> anyhow::Result<ItemRequest>;
    /// Newest first.
    async fn list_by_requestor(&self, requestor_id: i64) -> anyhow::Result<Vec<ItemRequest>>;
    /// Newest first.
    async fn list_all(&self) -> anyhow::Result<Vec<ItemRequest>>;
}

/// All ports bundled for wiring the service.
#[derive(Clone)]
pub struct Repositories {
    pub users: std::sync::Arc<dyn UsersRepository>,
    pub items: std::sync::Arc<dyn ItemsRepository>,
    pub bookings: std::sync::Arc<dyn BookingsRepository>,
    pub comments: std::sync::Arc<dyn CommentsRepository>,
    pub requests: std::sync::Arc<dyn RequestsRepository>,
}
