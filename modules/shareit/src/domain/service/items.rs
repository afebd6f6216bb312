use std::collections::HashMap;

use tracing::{debug, info, instrument};

use super::{db_error, non_blank, Service};
use crate::contract::model::{Booking, Comment, Item, ItemDetails, ItemPatch, NewItem};
use crate::domain::error::DomainError;
use crate::domain::lifecycle;

impl Service {
    #[instrument(name = "shareit.service.create_item", skip(self, new_item))]
    pub async fn create_item(&self, owner_id: i64, new_item: NewItem) -> Result<Item, DomainError> {
        info!("Creating item");

        self.validate_name("name", &new_item.name)?;
        self.validate_text("description", &new_item.description)?;

        self.require_user(owner_id).await?;
        if let Some(request_id) = new_item.request_id {
            self.requests
                .find_by_id(request_id)
                .await
                .map_err(db_error)?
                .ok_or_else(|| DomainError::request_not_found(request_id))?;
        }

        let item = self
            .items
            .insert(owner_id, new_item)
            .await
            .map_err(db_error)?;

        info!("Successfully created item with id={}", item.id);
        Ok(item)
    }

    #[instrument(
        name = "shareit.service.update_item",
        skip(self, patch),
        fields(user_id = actor_id)
    )]
    pub async fn update_item(
        &self,
        actor_id: i64,
        item_id: i64,
        patch: ItemPatch,
    ) -> Result<Item, DomainError> {
        info!("Updating item");

        let name = non_blank(patch.name);
        let description = non_blank(patch.description);
        if let Some(ref name) = name {
            self.validate_name("name", name)?;
        }
        if let Some(ref description) = description {
            self.validate_text("description", description)?;
        }

        self.require_user(actor_id).await?;
        let mut item = self.require_item(item_id).await?;
        if item.owner_id != actor_id {
            return Err(DomainError::not_item_owner(actor_id, item_id));
        }

        if let Some(name) = name {
            item.name = name;
        }
        if let Some(description) = description {
            item.description = description;
        }
        if let Some(available) = patch.available {
            item.available = available;
        }

        self.items.update(item.clone()).await.map_err(db_error)?;

        info!("Successfully updated item");
        Ok(item)
    }

    /// Item with comments; booking windows are shown to the owner only.
    #[instrument(
        name = "shareit.service.get_item",
        skip(self),
        fields(user_id = actor_id)
    )]
    pub async fn get_item(&self, actor_id: i64, item_id: i64) -> Result<ItemDetails, DomainError> {
        debug!("Getting item");

        let item = self.require_item(item_id).await?;
        let bookings = if item.owner_id == actor_id {
            self.bookings
                .list_by_items(&[item_id])
                .await
                .map_err(db_error)?
        } else {
            Vec::new()
        };
        let comments = self
            .comments
            .list_by_items(&[item_id])
            .await
            .map_err(db_error)?;

        Ok(self.details(item, &bookings, comments))
    }

    #[instrument(name = "shareit.service.list_owner_items", skip(self))]
    pub async fn list_owner_items(&self, owner_id: i64) -> Result<Vec<ItemDetails>, DomainError> {
        debug!("Listing owner items");

        self.require_user(owner_id).await?;
        let items = self
            .items
            .list_by_owner(owner_id)
            .await
            .map_err(db_error)?;
        let ids: Vec<i64> = items.iter().map(|i| i.id).collect();

        let mut bookings_by_item: HashMap<i64, Vec<Booking>> = HashMap::new();
        for b in self.bookings.list_by_items(&ids).await.map_err(db_error)? {
            bookings_by_item.entry(b.item.id).or_default().push(b);
        }
        let mut comments_by_item: HashMap<i64, Vec<Comment>> = HashMap::new();
        for c in self.comments.list_by_items(&ids).await.map_err(db_error)? {
            comments_by_item.entry(c.item_id).or_default().push(c);
        }

        let details = items
            .into_iter()
            .map(|item| {
                let bookings = bookings_by_item.remove(&item.id).unwrap_or_default();
                let comments = comments_by_item.remove(&item.id).unwrap_or_default();
                self.details(item, &bookings, comments)
            })
            .collect::<Vec<_>>();

        debug!("Listed {} items", details.len());
        Ok(details)
    }

    #[instrument(name = "shareit.service.search_items", skip(self))]
    pub async fn search_items(&self, text: &str) -> Result<Vec<Item>, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let items = self
            .items
            .search_available(text)
            .await
            .map_err(db_error)?;
        debug!("Search matched {} items", items.len());
        Ok(items)
    }

    fn details(&self, item: Item, bookings: &[Booking], comments: Vec<Comment>) -> ItemDetails {
        let (last_booking, next_booking) =
            lifecycle::last_and_next(bookings, self.clock.now(), self.config.last_booking_grace);
        ItemDetails {
            item,
            last_booking,
            next_booking,
            comments,
        }
    }
}
