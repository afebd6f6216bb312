use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::contract::model::{NewUser, User};
use crate::domain::repo::UsersRepository;
use crate::infra::storage::entity::{booking, comment, item, item_request, user};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let found = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("email_exists failed")?;
        Ok(count > 0)
    }

    async fn insert(&self, u: NewUser) -> anyhow::Result<User> {
        let m = user::ActiveModel {
            id: NotSet,
            name: Set(u.name),
            email: Set(u.email),
        };
        let saved = m.insert(&self.conn).await.context("insert failed")?;
        Ok(saved.into())
    }

    async fn update(&self, u: User) -> anyhow::Result<()> {
        let m = user::ActiveModel {
            id: Set(u.id),
            name: Set(u.name),
            email: Set(u.email),
        };
        let _ = m.update(&self.conn).await.context("update failed")?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = user::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let rows = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.conn)
            .await
            .context("list failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn is_referenced(&self, id: i64) -> anyhow::Result<bool> {
        let items = item::Entity::find()
            .filter(item::Column::OwnerId.eq(id))
            .count(&self.conn)
            .await
            .context("count owned items failed")?;
        let bookings = booking::Entity::find()
            .filter(booking::Column::BookerId.eq(id))
            .count(&self.conn)
            .await
            .context("count bookings failed")?;
        let comments = comment::Entity::find()
            .filter(comment::Column::AuthorId.eq(id))
            .count(&self.conn)
            .await
            .context("count comments failed")?;
        let requests = item_request::Entity::find()
            .filter(item_request::Column::RequestorId.eq(id))
            .count(&self.conn)
            .await
            .context("count requests failed")?;
        Ok(items + bookings + comments + requests > 0)
    }
}
