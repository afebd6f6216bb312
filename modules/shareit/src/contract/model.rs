use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Pure user model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Data for creating a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Partial update data for a user; blank values are ignored
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// An item listing. Ownership never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// Item as shown in the detail view and the owner's listing.
///
/// `last_booking`/`next_booking` are only filled in for the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetails {
    pub item: Item,
    pub last_booking: Option<BookingRef>,
    pub next_booking: Option<BookingRef>,
    pub comments: Vec<Comment>,
}

/// Short reference to a booking used on item views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRef {
    pub id: i64,
    pub booker_id: i64,
}

/// Minimal item projection embedded into bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSummary {
    pub id: i64,
    pub name: String,
}

/// Booking lifecycle status. WAITING is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Waiting)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time-relative booking filter used by the booker and owner listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingState {
    #[default]
    All,
    Current,
    Future,
    Past,
    Waiting,
    Rejected,
}

impl BookingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Current => "CURRENT",
            Self::Future => "FUTURE",
            Self::Past => "PAST",
            Self::Waiting => "WAITING",
            Self::Rejected => "REJECTED",
        }
    }
}

/// Error returned when a state string does not name a known filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownState(pub String);

impl fmt::Display for UnknownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown state: {}", self.0)
    }
}

impl std::error::Error for UnknownState {}

impl FromStr for BookingState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "CURRENT" => Ok(Self::Current),
            "FUTURE" => Ok(Self::Future),
            "PAST" => Ok(Self::Past),
            "WAITING" => Ok(Self::Waiting),
            "REJECTED" => Ok(Self::Rejected),
            _ => Err(UnknownState(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub item: ItemSummary,
    pub booker_id: i64,
    pub status: BookingStatus,
}

/// Booking request as submitted by a booker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub item_id: i64,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub item_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub text: String,
}

/// A wish posted on the request board, with the items listed in answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequest {
    pub id: i64,
    pub description: String,
    pub requestor_id: i64,
    pub created: DateTime<Utc>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemRequest {
    pub description: String,
}
