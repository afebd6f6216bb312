use std::collections::HashMap;

use tracing::{debug, info, instrument};

use super::{db_error, Service};
use crate::contract::model::{Item, ItemRequest, NewItemRequest};
use crate::domain::error::DomainError;
use crate::domain::repo::RequestDraft;

impl Service {
    #[instrument(
        name = "shareit.service.create_request",
        skip(self, new_request),
        fields(user_id = requestor_id)
    )]
    pub async fn create_request(
        &self,
        requestor_id: i64,
        new_request: NewItemRequest,
    ) -> Result<ItemRequest, DomainError> {
        info!("Creating item request");

        self.validate_text("description", &new_request.description)?;
        self.require_user(requestor_id).await?;

        let request = self
            .requests
            .insert(RequestDraft {
                requestor_id,
                description: new_request.description,
                created: self.clock.now(),
            })
            .await
            .map_err(db_error)?;

        info!("Successfully created request with id={}", request.id);
        Ok(request)
    }

    #[instrument(name = "shareit.service.list_own_requests", skip(self))]
    pub async fn list_own_requests(&self, requestor_id: i64) -> Result<Vec<ItemRequest>, DomainError> {
        self.require_user(requestor_id).await?;
        let requests = self
            .requests
            .list_by_requestor(requestor_id)
            .await
            .map_err(db_error)?;
        self.with_items(requests).await
    }

    #[instrument(name = "shareit.service.list_all_requests", skip(self))]
    pub async fn list_all_requests(&self) -> Result<Vec<ItemRequest>, DomainError> {
        let requests = self.requests.list_all().await.map_err(db_error)?;
        self.with_items(requests).await
    }

    #[instrument(name = "shareit.service.get_request", skip(self))]
    pub async fn get_request(&self, request_id: i64) -> Result<ItemRequest, DomainError> {
        let request = self
            .requests
            .find_by_id(request_id)
            .await
            .map_err(db_error)?
            .ok_or_else(|| DomainError::request_not_found(request_id))?;
        let mut out = self.with_items(vec![request]).await?;
        out.pop()
            .ok_or_else(|| DomainError::request_not_found(request_id))
    }

    /// Attach the items listed in answer to each request.
    async fn with_items(
        &self,
        mut requests: Vec<ItemRequest>,
    ) -> Result<Vec<ItemRequest>, DomainError> {
        let ids: Vec<i64> = requests.iter().map(|r| r.id).collect();
        let mut by_request: HashMap<i64, Vec<Item>> = HashMap::new();
        for item in self
            .items
            .list_by_requests(&ids)
            .await
            .map_err(db_error)?
        {
            if let Some(request_id) = item.request_id {
                by_request.entry(request_id).or_default().push(item);
            }
        }
        for request in &mut requests {
            request.items = by_request.remove(&request.id).unwrap_or_default();
        }
        debug!("Loaded {} requests", requests.len());
        Ok(requests)
    }
}
