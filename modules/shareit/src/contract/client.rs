use async_trait::async_trait;

use crate::contract::{
    error::ShareItError,
    model::{Booking, BookingState, Item, ItemDetails, NewBooking, User},
};

/// Public API trait for the shareit module that other modules can use
#[async_trait]
pub trait ShareItApi: Send + Sync {
    /// Get a user by ID
    async fn get_user(&self, id: i64) -> Result<User, ShareItError>;

    /// Get an item as seen by `actor_id`
    async fn get_item(&self, actor_id: i64, item_id: i64) -> Result<ItemDetails, ShareItError>;

    /// Available items matching the text
    async fn search_items(&self, text: &str) -> Result<Vec<Item>, ShareItError>;

    /// Request a booking; the result is WAITING
    async fn create_booking(
        &self,
        booker_id: i64,
        new_booking: NewBooking,
    ) -> Result<Booking, ShareItError>;

    /// Approve or reject a WAITING booking as the item owner
    async fn decide_booking(
        &self,
        owner_id: i64,
        booking_id: i64,
        approved: bool,
    ) -> Result<Booking, ShareItError>;

    /// Get a booking visible to the booker or the item owner
    async fn get_booking(&self, user_id: i64, booking_id: i64) -> Result<Booking, ShareItError>;

    /// Bookings made by `booker_id`
    async fn list_booker_bookings(
        &self,
        booker_id: i64,
        state: BookingState,
    ) -> Result<Vec<Booking>, ShareItError>;

    /// Bookings on items owned by `owner_id`
    async fn list_owner_bookings(
        &self,
        owner_id: i64,
        state: BookingState,
    ) -> Result<Vec<Booking>, ShareItError>;
}
