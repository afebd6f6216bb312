use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::contract::model::{Item, NewItem};
use crate::domain::repo::ItemsRepository;
use crate::infra::storage::entity::item;

pub struct SeaOrmItemsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmItemsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

/// Case-insensitive substring match on name or description.
///
/// SQLite's `LOWER()` only folds ASCII, so folding happens here with Unicode rules.
fn matches_text(i: &item::Model, needle: &str) -> bool {
    i.name.to_lowercase().contains(needle) || i.description.to_lowercase().contains(needle)
}

#[async_trait::async_trait]
impl<C> ItemsRepository for SeaOrmItemsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Item>> {
        let found = item::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn insert(&self, owner_id: i64, new_item: NewItem) -> anyhow::Result<Item> {
        let m = item::ActiveModel {
            id: NotSet,
            name: Set(new_item.name),
            description: Set(new_item.description),
            available: Set(new_item.available),
            owner_id: Set(owner_id),
            request_id: Set(new_item.request_id),
        };
        let saved = m.insert(&self.conn).await.context("insert failed")?;
        Ok(saved.into())
    }

    async fn update(&self, i: Item) -> anyhow::Result<()> {
        let m = item::ActiveModel {
            id: Set(i.id),
            name: Set(i.name),
            description: Set(i.description),
            available: Set(i.available),
            owner_id: Set(i.owner_id),
            request_id: Set(i.request_id),
        };
        let _ = m.update(&self.conn).await.context("update failed")?;
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Item>> {
        let rows = item::Entity::find()
            .filter(item::Column::OwnerId.eq(owner_id))
            .order_by_asc(item::Column::Id)
            .all(&self.conn)
            .await
            .context("list_by_owner failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search_available(&self, text: &str) -> anyhow::Result<Vec<Item>> {
        let needle = text.to_lowercase();
        let rows = item::Entity::find()
            .filter(item::Column::Available.eq(true))
            .order_by_asc(item::Column::Id)
            .all(&self.conn)
            .await
            .context("search_available failed")?;
        Ok(rows
            .into_iter()
            .filter(|m| matches_text(m, &needle))
            .map(Into::into)
            .collect())
    }

    async fn list_by_requests(&self, request_ids: &[i64]) -> anyhow::Result<Vec<Item>> {
        if request_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = item::Entity::find()
            .filter(item::Column::RequestId.is_in(request_ids.to_vec()))
            .order_by_asc(item::Column::Id)
            .all(&self.conn)
            .await
            .context("list_by_requests failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
