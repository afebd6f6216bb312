use anyhow::anyhow;
use sea_orm::entity::prelude::*;

use crate::contract::model::{Booking, BookingStatus};

/// Stored as the upper-case status name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Status {
    #[sea_orm(string_value = "WAITING")]
    Waiting,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl From<Status> for BookingStatus {
    fn from(s: Status) -> Self {
        match s {
            Status::Waiting => Self::Waiting,
            Status::Approved => Self::Approved,
            Status::Rejected => Self::Rejected,
        }
    }
}

impl From<BookingStatus> for Status {
    fn from(s: BookingStatus) -> Self {
        match s {
            BookingStatus::Waiting => Self::Waiting,
            BookingStatus::Approved => Self::Approved,
            BookingStatus::Rejected => Self::Rejected,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: Status,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id"
    )]
    Item,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::BookerId",
        to = "super::user::Column::Id"
    )]
    Booker,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booker.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Assemble a contract booking from a row joined with its item.
pub fn into_booking(
    (m, item): (Model, Option<super::item::Model>),
) -> anyhow::Result<Booking> {
    let item = item.ok_or_else(|| anyhow!("booking {} references missing item {}", m.id, m.item_id))?;
    Ok(Booking {
        id: m.id,
        start: m.start_date,
        end: m.end_date,
        item: (&item).into(),
        booker_id: m.booker_id,
        status: m.status.into(),
    })
}
