use anyhow::Context;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use crate::contract::model::{Booking, BookingStatus};
use crate::domain::repo::{BookingDraft, BookingsRepository};
use crate::infra::storage::entity::booking::{self, into_booking, Status};
use crate::infra::storage::entity::item;

/// Bookings need transactions for the availability re-check on insert.
pub struct SeaOrmBookingsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmBookingsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn collect(rows: Vec<(booking::Model, Option<item::Model>)>) -> anyhow::Result<Vec<Booking>> {
    rows.into_iter().map(into_booking).collect()
}

#[async_trait::async_trait]
impl<C> BookingsRepository for SeaOrmBookingsRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Booking>> {
        let found = booking::Entity::find_by_id(id)
            .find_also_related(item::Entity)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        found.map(into_booking).transpose()
    }

    async fn insert_if_item_available(
        &self,
        draft: BookingDraft,
    ) -> anyhow::Result<Option<Booking>> {
        let txn = self.conn.begin().await.context("begin failed")?;

        let item = item::Entity::find_by_id(draft.item_id)
            .one(&txn)
            .await
            .context("item re-read failed")?;
        let item = match item {
            Some(item) if item.available => item,
            _ => {
                txn.rollback().await.context("rollback failed")?;
                return Ok(None);
            }
        };

        let m = booking::ActiveModel {
            id: NotSet,
            start_date: Set(draft.start),
            end_date: Set(draft.end),
            item_id: Set(draft.item_id),
            booker_id: Set(draft.booker_id),
            status: Set(Status::Waiting),
        };
        let saved = m.insert(&txn).await.context("insert failed")?;
        txn.commit().await.context("commit failed")?;

        into_booking((saved, Some(item))).map(Some)
    }

    async fn decide(&self, id: i64, status: BookingStatus) -> anyhow::Result<bool> {
        let res = booking::Entity::update_many()
            .col_expr(booking::Column::Status, Expr::value(Status::from(status)))
            .filter(booking::Column::Id.eq(id))
            .filter(booking::Column::Status.eq(Status::Waiting))
            .exec(&self.conn)
            .await
            .context("decide failed")?;
        Ok(res.rows_affected == 1)
    }

    async fn list_by_booker(&self, booker_id: i64) -> anyhow::Result<Vec<Booking>> {
        let rows = booking::Entity::find()
            .find_also_related(item::Entity)
            .filter(booking::Column::BookerId.eq(booker_id))
            .order_by_desc(booking::Column::StartDate)
            .order_by_desc(booking::Column::Id)
            .all(&self.conn)
            .await
            .context("list_by_booker failed")?;
        collect(rows)
    }

    async fn list_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Booking>> {
        let rows = booking::Entity::find()
            .find_also_related(item::Entity)
            .filter(item::Column::OwnerId.eq(owner_id))
            .order_by_desc(booking::Column::StartDate)
            .order_by_desc(booking::Column::Id)
            .all(&self.conn)
            .await
            .context("list_by_owner failed")?;
        collect(rows)
    }

    async fn list_by_items(&self, item_ids: &[i64]) -> anyhow::Result<Vec<Booking>> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = booking::Entity::find()
            .find_also_related(item::Entity)
            .filter(booking::Column::ItemId.is_in(item_ids.to_vec()))
            .order_by_asc(booking::Column::Id)
            .all(&self.conn)
            .await
            .context("list_by_items failed")?;
        collect(rows)
    }
}
