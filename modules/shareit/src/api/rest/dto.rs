use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{
    Booking, BookingRef, BookingStatus, Comment, Item, ItemDetails, ItemPatch, ItemRequest,
    NewBooking, NewComment, NewItem, NewItemRequest, NewUser, User, UserPatch,
};
use crate::domain::error::DomainError;

// ---------- users ----------

/// REST DTO for user representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// REST DTO for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserReq {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// REST DTO for updating a user (partial)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserReq {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

impl TryFrom<CreateUserReq> for NewUser {
    type Error = DomainError;

    fn try_from(req: CreateUserReq) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required("name", req.name)?,
            email: required("email", req.email)?,
        })
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

// ---------- items ----------

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
}

/// Booking reference shown on the owner's item views.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingShortDto {
    pub id: i64,
    pub booker_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailsDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
    pub last_booking: Option<BookingShortDto>,
    pub next_booking: Option<BookingShortDto>,
    pub comments: Vec<CommentDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemReq {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
    pub request_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemReq {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Text to look for in item names and descriptions
    pub text: Option<String>,
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            request_id: item.request_id,
        }
    }
}

impl From<BookingRef> for BookingShortDto {
    fn from(r: BookingRef) -> Self {
        Self {
            id: r.id,
            booker_id: r.booker_id,
        }
    }
}

impl From<ItemDetails> for ItemDetailsDto {
    fn from(d: ItemDetails) -> Self {
        Self {
            id: d.item.id,
            name: d.item.name,
            description: d.item.description,
            available: d.item.available,
            request_id: d.item.request_id,
            last_booking: d.last_booking.map(Into::into),
            next_booking: d.next_booking.map(Into::into),
            comments: d.comments.into_iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<CreateItemReq> for NewItem {
    type Error = DomainError;

    fn try_from(req: CreateItemReq) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required("name", req.name)?,
            description: required("description", req.description)?,
            available: req
                .available
                .ok_or_else(|| DomainError::validation("available", "must be provided"))?,
            request_id: req.request_id,
        })
    }
}

impl From<UpdateItemReq> for ItemPatch {
    fn from(req: UpdateItemReq) -> Self {
        Self {
            name: req.name,
            description: req.description,
            available: req.available,
        }
    }
}

// ---------- bookings ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatusDto {
    Waiting,
    Approved,
    Rejected,
}

impl From<BookingStatus> for BookingStatusDto {
    fn from(s: BookingStatus) -> Self {
        match s {
            BookingStatus::Waiting => Self::Waiting,
            BookingStatus::Approved => Self::Approved,
            BookingStatus::Rejected => Self::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookedItemDto {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookerDto {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub item: BookedItemDto,
    pub booker: BookerDto,
    pub status: BookingStatusDto,
}

/// Timestamps accept RFC 3339 or a zone-less `YYYY-MM-DDTHH:MM:SS`, read as UTC.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingReq {
    pub item_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_time::deserialize")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_time::deserialize")]
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DecideQuery {
    /// `true` approves, `false` rejects
    pub approved: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StateQuery {
    /// ALL (default), CURRENT, FUTURE, PAST, WAITING or REJECTED
    pub state: Option<String>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            start: b.start,
            end: b.end,
            item: BookedItemDto {
                id: b.item.id,
                name: b.item.name,
            },
            booker: BookerDto { id: b.booker_id },
            status: b.status.into(),
        }
    }
}

impl TryFrom<CreateBookingReq> for NewBooking {
    type Error = DomainError;

    fn try_from(req: CreateBookingReq) -> Result<Self, Self::Error> {
        Ok(Self {
            item_id: req
                .item_id
                .ok_or_else(|| DomainError::validation("itemId", "must be provided"))?,
            start: req.start,
            end: req.end,
        })
    }
}

mod lenient_time {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(de)? else {
            return Ok(None);
        };
        if let Ok(t) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(t.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|t| Some(t.and_utc()))
            .map_err(serde::de::Error::custom)
    }
}

// ---------- comments ----------

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: i64,
    pub text: String,
    pub item_id: i64,
    pub author_name: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentReq {
    pub text: Option<String>,
}

impl From<Comment> for CommentDto {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            text: c.text,
            item_id: c.item_id,
            author_name: c.author_name,
            created: c.created,
        }
    }
}

impl TryFrom<CreateCommentReq> for NewComment {
    type Error = DomainError;

    fn try_from(req: CreateCommentReq) -> Result<Self, Self::Error> {
        Ok(Self {
            text: required("text", req.text)?,
        })
    }
}

// ---------- requests ----------

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequestDto {
    pub id: i64,
    pub description: String,
    pub requestor_id: i64,
    pub created: DateTime<Utc>,
    pub items: Vec<ItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequestReq {
    pub description: Option<String>,
}

impl From<ItemRequest> for ItemRequestDto {
    fn from(r: ItemRequest) -> Self {
        Self {
            id: r.id,
            description: r.description,
            requestor_id: r.requestor_id,
            created: r.created,
            items: r.items.into_iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<CreateItemRequestReq> for NewItemRequest {
    type Error = DomainError;

    fn try_from(req: CreateItemRequestReq) -> Result<Self, Self::Error> {
        Ok(Self {
            description: required("description", req.description)?,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, DomainError> {
    value.ok_or_else(|| DomainError::validation(field, "must be provided"))
}
