use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::contract::model::Comment;
use crate::domain::repo::{CommentDraft, CommentsRepository};
use crate::infra::storage::entity::comment::{self, into_comment};
use crate::infra::storage::entity::user;

pub struct SeaOrmCommentsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmCommentsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> CommentsRepository for SeaOrmCommentsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, draft: CommentDraft) -> anyhow::Result<Comment> {
        let author = user::Entity::find_by_id(draft.author_id)
            .one(&self.conn)
            .await
            .context("author lookup failed")?;
        let m = comment::ActiveModel {
            id: NotSet,
            text: Set(draft.text),
            item_id: Set(draft.item_id),
            author_id: Set(draft.author_id),
            created: Set(draft.created),
        };
        let saved = m.insert(&self.conn).await.context("insert failed")?;
        into_comment((saved, author))
    }

    async fn list_by_items(&self, item_ids: &[i64]) -> anyhow::Result<Vec<Comment>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = comment::Entity::find()
            .find_also_related(user::Entity)
            .filter(comment::Column::ItemId.is_in(item_ids.to_vec()))
            .order_by_asc(comment::Column::Created)
            .order_by_asc(comment::Column::Id)
            .all(&self.conn)
            .await
            .context("list_by_items failed")?;
        rows.into_iter().map(into_comment).collect()
    }
}
