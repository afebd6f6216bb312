use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::contract::model::ItemRequest;
use crate::domain::repo::{RequestDraft, RequestsRepository};
use crate::infra::storage::entity::item_request;

pub struct SeaOrmRequestsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmRequestsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> RequestsRepository for SeaOrmRequestsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<ItemRequest>> {
        let found = item_request::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, draft: RequestDraft) -> anyhow::Result<ItemRequest> {
        let m = item_request::ActiveModel {
            id: NotSet,
            description: Set(draft.description),
            requestor_id: Set(draft.requestor_id),
            created: Set(draft.created),
        };
        let saved = m.insert(&self.conn).await.context("insert failed")?;
        Ok(saved.into())
    }

    async fn list_by_requestor(&self, requestor_id: i64) -> anyhow::Result<Vec<ItemRequest>> {
        let rows = item_request::Entity::find()
            .filter(item_request::Column::RequestorId.eq(requestor_id))
            .order_by_desc(item_request::Column::Created)
            .order_by_desc(item_request::Column::Id)
            .all(&self.conn)
            .await
            .context("list_by_requestor failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<ItemRequest>> {
        let rows = item_request::Entity::find()
            .order_by_desc(item_request::Column::Created)
            .order_by_desc(item_request::Column::Id)
            .all(&self.conn)
            .await
            .context("list_all failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
