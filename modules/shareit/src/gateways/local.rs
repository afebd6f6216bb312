use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::ShareItApi,
    error::ShareItError,
    model::{Booking, BookingState, Item, ItemDetails, NewBooking, User},
};
use crate::domain::service::Service;

/// In-process implementation of [`ShareItApi`] backed by the domain service
pub struct ShareItLocalClient {
    service: Arc<Service>,
}

impl ShareItLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ShareItApi for ShareItLocalClient {
    async fn get_user(&self, id: i64) -> Result<User, ShareItError> {
        self.service.get_user(id).await.map_err(Into::into)
    }

    async fn get_item(&self, actor_id: i64, item_id: i64) -> Result<ItemDetails, ShareItError> {
        self.service
            .get_item(actor_id, item_id)
            .await
            .map_err(Into::into)
    }

    async fn search_items(&self, text: &str) -> Result<Vec<Item>, ShareItError> {
        self.service.search_items(text).await.map_err(Into::into)
    }

    async fn create_booking(
        &self,
        booker_id: i64,
        new_booking: NewBooking,
    ) -> Result<Booking, ShareItError> {
        self.service
            .create_booking(booker_id, new_booking)
            .await
            .map_err(Into::into)
    }

    async fn decide_booking(
        &self,
        owner_id: i64,
        booking_id: i64,
        approved: bool,
    ) -> Result<Booking, ShareItError> {
        self.service
            .decide_booking(owner_id, booking_id, approved)
            .await
            .map_err(Into::into)
    }

    async fn get_booking(&self, user_id: i64, booking_id: i64) -> Result<Booking, ShareItError> {
        self.service
            .get_booking(user_id, booking_id)
            .await
            .map_err(Into::into)
    }

    async fn list_booker_bookings(
        &self,
        booker_id: i64,
        state: BookingState,
    ) -> Result<Vec<Booking>, ShareItError> {
        self.service
            .list_booker_bookings(booker_id, state)
            .await
            .map_err(Into::into)
    }

    async fn list_owner_bookings(
        &self,
        owner_id: i64,
        state: BookingState,
    ) -> Result<Vec<Booking>, ShareItError> {
        self.service
            .list_owner_bookings(owner_id, state)
            .await
            .map_err(Into::into)
    }
}
