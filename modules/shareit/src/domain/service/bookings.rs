use tracing::{debug, info, instrument, warn};

use super::{db_error, Service};
use crate::contract::model::{Booking, BookingState, NewBooking};
use crate::domain::error::DomainError;
use crate::domain::lifecycle;
use crate::domain::repo::BookingDraft;

impl Service {
    /// Request a booking. The result is WAITING; item availability is left untouched.
    #[instrument(
        name = "shareit.service.create_booking",
        skip(self, new_booking),
        fields(item_id = new_booking.item_id)
    )]
    pub async fn create_booking(
        &self,
        booker_id: i64,
        new_booking: NewBooking,
    ) -> Result<Booking, DomainError> {
        info!("Creating booking");

        let start = new_booking
            .start
            .ok_or_else(|| DomainError::validation("start", "must be provided"))?;
        let end = new_booking
            .end
            .ok_or_else(|| DomainError::validation("end", "must be provided"))?;
        if start >= end {
            return Err(DomainError::validation("start", "must be before end"));
        }

        let item = self.require_item(new_booking.item_id).await?;
        self.require_user(booker_id).await?;
        if !item.available {
            return Err(DomainError::item_unavailable(item.id));
        }
        if item.owner_id == booker_id {
            return Err(DomainError::own_item_booking(item.id));
        }

        let draft = BookingDraft {
            item_id: item.id,
            booker_id,
            start,
            end,
        };
        let booking = self
            .bookings
            .insert_if_item_available(draft)
            .await
            .map_err(db_error)?
            .ok_or_else(|| {
                warn!("Item became unavailable while booking");
                DomainError::item_unavailable(item.id)
            })?;

        info!("Successfully created booking with id={}", booking.id);
        Ok(booking)
    }

    /// Owner approves or rejects a WAITING booking. Decisions are final.
    #[instrument(
        name = "shareit.service.decide_booking",
        skip(self),
        fields(user_id = owner_id)
    )]
    pub async fn decide_booking(
        &self,
        owner_id: i64,
        booking_id: i64,
        approved: bool,
    ) -> Result<Booking, DomainError> {
        info!("Deciding booking");

        let mut booking = self.require_booking(booking_id).await?;
        let item = self.require_item(booking.item.id).await?;
        if item.owner_id != owner_id {
            return Err(DomainError::not_item_owner(owner_id, item.id));
        }

        let next = lifecycle::decide(booking.status, approved)
            .map_err(|status| DomainError::already_decided(booking_id, status))?;

        let won = self
            .bookings
            .decide(booking_id, next)
            .await
            .map_err(db_error)?;
        if !won {
            // Another decision landed between the read and the guarded update.
            let fresh = self.require_booking(booking_id).await?;
            warn!(status = %fresh.status, "Lost decision race");
            return Err(DomainError::already_decided(booking_id, fresh.status));
        }

        booking.status = next;
        info!(status = %booking.status, "Booking decided");
        Ok(booking)
    }

    /// A booking is visible to its booker and to the item owner.
    #[instrument(name = "shareit.service.get_booking", skip(self))]
    pub async fn get_booking(&self, user_id: i64, booking_id: i64) -> Result<Booking, DomainError> {
        debug!("Getting booking");

        let booking = self.require_booking(booking_id).await?;
        if booking.booker_id != user_id {
            let item = self.require_item(booking.item.id).await?;
            if item.owner_id != user_id {
                return Err(DomainError::not_booking_party(user_id, booking_id));
            }
        }
        Ok(booking)
    }

    #[instrument(name = "shareit.service.list_booker_bookings", skip(self), fields(state = state.as_str()))]
    pub async fn list_booker_bookings(
        &self,
        booker_id: i64,
        state: BookingState,
    ) -> Result<Vec<Booking>, DomainError> {
        self.require_user(booker_id).await?;
        let all = self
            .bookings
            .list_by_booker(booker_id)
            .await
            .map_err(db_error)?;
        let bookings = lifecycle::select(all, state, self.clock.now());
        debug!("Listed {} bookings", bookings.len());
        Ok(bookings)
    }

    #[instrument(name = "shareit.service.list_owner_bookings", skip(self), fields(state = state.as_str()))]
    pub async fn list_owner_bookings(
        &self,
        owner_id: i64,
        state: BookingState,
    ) -> Result<Vec<Booking>, DomainError> {
        self.require_user(owner_id).await?;
        let all = self
            .bookings
            .list_by_owner(owner_id)
            .await
            .map_err(db_error)?;
        let bookings = lifecycle::select(all, state, self.clock.now());
        debug!("Listed {} bookings", bookings.len());
        Ok(bookings)
    }

    async fn require_booking(&self, id: i64) -> Result<Booking, DomainError> {
        self.bookings
            .find_by_id(id)
            .await
            .map_err(db_error)?
            .ok_or_else(|| DomainError::booking_not_found(id))
    }
}
